use std::fs::File;
use std::io::Read;
use std::path::Path;

use zip::ZipArchive;

use crate::batch::DocumentRead;
use crate::error::FinstatError;
use crate::extraction::{DocumentBody, SourceDocument};
use crate::model::ItemError;
use crate::source::{basename, has_extension, source_unreadable};

#[derive(Debug)]
struct Member {
    index: usize,
    name: String,
}

/// XML members of a ZIP archive (e.g. KVK `jaarrekeningen_partN.zip`), in
/// archive order. Non-XML members are passed over.
#[derive(Debug)]
pub struct ZipDocuments {
    archive: ZipArchive<File>,
    members: std::vec::IntoIter<Member>,
}

impl ZipDocuments {
    pub fn open(path: &Path) -> Result<Self, FinstatError> {
        let file = File::open(path).map_err(|e| source_unreadable(path, e))?;
        let mut archive = ZipArchive::new(file).map_err(|e| source_unreadable(path, e))?;

        let mut members = Vec::new();
        for index in 0..archive.len() {
            match archive.by_index_raw(index) {
                Ok(entry) => {
                    if has_extension(entry.name(), "xml") {
                        members.push(Member {
                            index,
                            name: entry.name().to_string(),
                        });
                    }
                }
                // Keep it so the failure shows up in the batch errors.
                Err(_) => members.push(Member {
                    index,
                    name: format!("#{index}"),
                }),
            }
        }
        log::debug!("{}: {} XML member(s)", path.display(), members.len());

        Ok(ZipDocuments {
            archive,
            members: members.into_iter(),
        })
    }

    fn read_member(&mut self, member: &Member) -> Result<Vec<u8>, String> {
        let mut entry = self
            .archive
            .by_index(member.index)
            .map_err(|e| e.to_string())?;
        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes).map_err(|e| e.to_string())?;
        Ok(bytes)
    }
}

impl Iterator for ZipDocuments {
    type Item = DocumentRead;

    fn next(&mut self) -> Option<Self::Item> {
        let member = self.members.next()?;
        let id = basename(&member.name).to_string();
        Some(match self.read_member(&member) {
            Ok(bytes) => Ok(SourceDocument::new(id, DocumentBody::Bytes(bytes))),
            Err(message) => Err(ItemError { item: id, message }),
        })
    }
}
