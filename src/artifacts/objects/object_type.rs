use anyhow::Context;
use std::io::BufRead;

/// Type tag at the front of every stored object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    Blob,
    Commit,
}

impl ObjectType {
    pub fn as_str(&self) -> &str {
        match self {
            ObjectType::Blob => "blob",
            ObjectType::Commit => "commit",
        }
    }

    /// Consume the `<type> <size>\0` header, leaving the reader at the payload
    pub fn parse_object_type(reader: &mut impl BufRead) -> anyhow::Result<ObjectType> {
        let mut tag = Vec::new();
        reader.read_until(b' ', &mut tag)?;
        if tag.pop() != Some(b' ') {
            anyhow::bail!("Object header is missing its type tag");
        }
        let object_type = ObjectType::try_from(std::str::from_utf8(&tag)?)?;

        let mut size = Vec::new();
        reader.read_until(b'\0', &mut size)?;
        if size.pop() != Some(b'\0') {
            anyhow::bail!("Object header is not terminated");
        }
        std::str::from_utf8(&size)?
            .parse::<usize>()
            .with_context(|| format!("Invalid {object_type} size in object header"))?;

        Ok(object_type)
    }
}

impl TryFrom<&str> for ObjectType {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> anyhow::Result<Self> {
        match value {
            "blob" => Ok(ObjectType::Blob),
            "commit" => Ok(ObjectType::Commit),
            _ => anyhow::bail!("Unknown object type: {value}"),
        }
    }
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
