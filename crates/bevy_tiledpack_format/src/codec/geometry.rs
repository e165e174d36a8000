use std::io::{Read, Write};

use bevy::math::Vec2;

use super::binary::{BinaryReader, BinaryWriter, MAX_PREALLOCATION};
use crate::error::CodecError;

/// Writes a point count followed by each point as two `f32`s.
pub fn write_points<W: Write>(
    writer: &mut BinaryWriter<W>,
    points: &[Vec2],
) -> Result<(), CodecError> {
    writer.write_count("point count", points.len())?;
    for point in points {
        writer.write_vec2(*point)?;
    }
    Ok(())
}

pub fn read_points<R: Read>(reader: &mut BinaryReader<R>) -> Result<Vec<Vec2>, CodecError> {
    let count = reader.read_count("point count")?;
    let mut points = Vec::with_capacity(count.min(MAX_PREALLOCATION));
    for _ in 0..count {
        points.push(reader.read_vec2("point")?);
    }
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangle_keeps_exact_coordinates() {
        let points = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(12.25, -3.5),
            Vec2::new(0.1, 1.0e-7),
        ];
        let mut writer = BinaryWriter::new(Vec::new());
        write_points(&mut writer, &points).unwrap();
        let bytes = writer.into_inner();
        assert_eq!(bytes.len(), 4 + 3 * 8);

        let decoded = read_points(&mut BinaryReader::new(bytes.as_slice())).unwrap();
        assert_eq!(decoded.len(), 3);
        for (a, b) in decoded.iter().zip(&points) {
            assert_eq!(a.x.to_bits(), b.x.to_bits());
            assert_eq!(a.y.to_bits(), b.y.to_bits());
        }
    }

    #[test]
    fn test_empty_sequence_is_not_an_error() {
        let mut writer = BinaryWriter::new(Vec::new());
        write_points(&mut writer, &[]).unwrap();
        let bytes = writer.into_inner();
        let decoded = read_points(&mut BinaryReader::new(bytes.as_slice())).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_negative_count_fails() {
        let bytes = (-4i32).to_le_bytes();
        assert!(matches!(
            read_points(&mut BinaryReader::new(bytes.as_slice())),
            Err(CodecError::MalformedInput {
                field: "point count",
                ..
            })
        ));
    }

    #[test]
    fn test_huge_count_fails_on_truncation() {
        let bytes = i32::MAX.to_le_bytes();
        assert!(matches!(
            read_points(&mut BinaryReader::new(bytes.as_slice())),
            Err(CodecError::MalformedInput { field: "point", .. })
        ));
    }
}
