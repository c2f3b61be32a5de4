use std::{fs, path::Path};

use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

/// Read a file to a string.
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<String> {
    Ok(fs::read_to_string(path)?)
}

pub fn deserialize_from_file<P, D>(path: P) -> Result<D>
where
    P: AsRef<Path>,
    D: DeserializeOwned,
{
    let path = path.as_ref();
    let s = read_file(path)?;
    ron::de::from_str(&s).map_err(|e| Error::from_ron_de_error(e, path.into()))
}
