use std::io::{Read, Write};

use super::binary::{BinaryReader, BinaryWriter};
use crate::error::CodecError;
use crate::model::Properties;

/// Writes the entry count followed by every key/value pair in insertion order.
pub fn write_properties<W: Write>(
    writer: &mut BinaryWriter<W>,
    properties: &Properties,
) -> Result<(), CodecError> {
    writer.write_count("property count", properties.len())?;
    for (key, value) in properties {
        writer.write_str(key)?;
        writer.write_str(value)?;
    }
    Ok(())
}

pub fn read_properties<R: Read>(reader: &mut BinaryReader<R>) -> Result<Properties, CodecError> {
    let count = reader.read_count("property count")?;
    let mut properties = Properties::new();
    for _ in 0..count {
        let key = reader.read_string("property key")?;
        let value = reader.read_string("property value")?;
        properties.insert(key, value);
    }
    Ok(properties)
}
