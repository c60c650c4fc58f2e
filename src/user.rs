use std::path::Path;

use crate::error::ReadError;
use crate::records;

//One entry of the passwd database: name:password:uid:gid:gecos:home:shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub uid: u32,
    pub name: String,
}

impl UserRecord {
    /// Parses one passwd line. Fields are split on `:` as-is, so empty
    /// password or GECOS fields do not shift the uid.
    pub fn parse(line: &str) -> Option<UserRecord> {
        let mut fields = line.split(':');
        let name = fields.next()?.trim();
        let _password = fields.next()?;
        let uid = fields.next()?.trim().parse().ok()?;
        if name.is_empty() || name.starts_with('#') {
            return None;
        }
        Some(UserRecord {
            uid,
            name: name.to_string(),
        })
    }
}

/// Name of the first record in the passwd file at `path` whose uid matches.
pub fn lookup_user(path: &Path, uid: u32) -> Result<Option<String>, ReadError> {
    for line in records::read_lines(path)? {
        match UserRecord::parse(&line?) {
            Some(record) if record.uid == uid => return Ok(Some(record.name)),
            _ => continue,
        }
    }
    Ok(None)
}
