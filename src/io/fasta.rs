use std::io::{Read, Write};

use bio::io::fasta;

use super::FormatError;
use crate::chimera::ContigStore;

/// Read every record into an ordered store keyed by record id.
pub fn read_fasta<R: Read>(reader: R) -> Result<ContigStore, FormatError> {
    let mut contigs = ContigStore::new();
    for (idx, record) in fasta::Reader::new(reader).records().enumerate() {
        let record = record?;
        if contigs.contains_key(record.id()) {
            return Err(FormatError::parse(
                "FASTA",
                idx + 1,
                format!("duplicate record id '{}'", record.id()),
            ));
        }
        contigs.insert(record.id().to_string(), record.seq().to_vec());
    }
    Ok(contigs)
}

/// Write every contig in store order.
pub fn write_fasta<W: Write>(writer: W, contigs: &ContigStore) -> Result<(), FormatError> {
    let mut writer = fasta::Writer::new(writer);
    for (name, sequence) in contigs {
        writer.write(name, None, sequence)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_keep_file_order() {
        let input = ">tig2 some description\nACGT\nTT\n>tig1\nGGCC\n";
        let contigs = read_fasta(input.as_bytes()).unwrap();
        let names: Vec<&str> = contigs.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["tig2", "tig1"]);
        assert_eq!(contigs["tig2"], b"ACGTTT".to_vec());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let input = ">tig\nAC\n>tig\nGT\n";
        let err = read_fasta(input.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn written_records_read_back() {
        let mut contigs = ContigStore::new();
        contigs.insert("tig_chimera_broken:0-4".to_string(), b"ACGT".to_vec());
        contigs.insert("tig_chimera_broken:4-6".to_string(), b"GG".to_vec());

        let mut buffer = Vec::new();
        write_fasta(&mut buffer, &contigs).unwrap();
        assert_eq!(read_fasta(buffer.as_slice()).unwrap(), contigs);
    }
}
