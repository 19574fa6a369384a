use bitstream::{BitError, BitReader, BitWriter};

#[test]
fn writer_output_is_byte_aligned() {
    let mut writer = BitWriter::new();
    writer.write_bits(5, 12).unwrap();
    writer.write_bits(3, 9).unwrap();
    assert_eq!(writer.bits_written(), 21);
    let bytes = writer.finish();
    assert_eq!(bytes.len(), 3);

    let mut reader = BitReader::new(&bytes);
    assert_eq!(reader.read_bits(12).unwrap(), 5);
    assert_eq!(reader.read_bits(9).unwrap(), 3);
    // only the zero padding is left
    assert_eq!(reader.bits_remaining(), 3);
    assert_eq!(reader.read_bits(3).unwrap(), 0);
}

#[test]
fn reading_more_fields_than_written_fails() {
    let mut writer = BitWriter::new();
    writer.write_bool(true);
    writer.write_bits(0x7F, 7).unwrap();
    let bytes = writer.finish();

    let mut reader = BitReader::new(&bytes);
    assert!(reader.read_bool().unwrap());
    assert_eq!(reader.read_bits(7).unwrap(), 0x7F);
    assert!(matches!(
        reader.read_bool(),
        Err(BitError::UnexpectedEof { .. })
    ));
}
