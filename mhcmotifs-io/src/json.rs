use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::Result;

///
/// Serialize a value to a JSON file, creating parent directories as needed.
///
/// # Arguments
/// - value: the value to dump
/// - path: the path to the file to dump to
/// - pretty: indent the output
pub fn write_json<T, P>(value: &T, path: P, pretty: bool) -> Result<()>
where
    T: Serialize + ?Sized,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = BufWriter::new(File::create(path)?);
    match pretty {
        true => serde_json::to_writer_pretty(&mut writer, value)?,
        false => serde_json::to_writer(&mut writer, value)?,
    }
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::BTreeMap;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    #[case(false, "{\"hla_a_02_01\":9}")]
    #[case(true, "{\n  \"hla_a_02_01\": 9\n}")]
    fn test_write_json(#[case] pretty: bool, #[case] expected: &str) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/motifs/out.json");

        let value = BTreeMap::from([("hla_a_02_01", 9)]);
        write_json(&value, &path, pretty).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), expected);
    }
}
