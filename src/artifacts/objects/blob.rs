//! Blob object
//!
//! A blob is the content of one file at one point in time. Its identity
//! covers the path label as well as the bytes, so the same content under two
//! paths is stored as two blobs.
//!
//! ## Format
//!
//! On disk: `blob <size>\0<path label>\0<content>`

use crate::artifacts::objects::object::Unpackable;
use crate::artifacts::objects::object::{Object, Packable};
use crate::artifacts::objects::object_type::ObjectType;
use bytes::Bytes;
use derive_new::new;
use std::io::{BufRead, Write};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Blob {
    /// Path the content was read from, relative to the work tree
    label: PathBuf,
    content: Bytes,
}

impl Blob {
    pub fn content(&self) -> &Bytes {
        &self.content
    }

    pub fn into_content(self) -> Bytes {
        self.content
    }
}

impl Packable for Blob {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let label = self.label.to_string_lossy();

        let mut payload = Vec::with_capacity(label.len() + 1 + self.content.len());
        payload.write_all(label.as_bytes())?;
        payload.write_all(b"\0")?;
        payload.write_all(&self.content)?;

        self.frame(&payload)
    }
}

impl Unpackable for Blob {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        // the header has already been read
        let mut label = Vec::new();
        reader.read_until(b'\0', &mut label)?;
        if label.pop() != Some(b'\0') {
            anyhow::bail!("Blob is missing its path label terminator");
        }
        let label = String::from_utf8(label)?;

        let mut content = Vec::new();
        reader.read_to_end(&mut content)?;

        Ok(Self::new(PathBuf::from(label), Bytes::from(content)))
    }
}

impl Object for Blob {
    fn object_type(&self) -> ObjectType {
        ObjectType::Blob
    }

    fn display(&self) -> String {
        String::from_utf8_lossy(&self.content).to_string()
    }
}
