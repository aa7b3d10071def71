//! Folding classified lines into resource records

use crate::classify::{Classifier, LineEvent};
use crate::error::Result;
use crate::parents::ParentIndex;
use crate::resource::{BlockKind, Existence, Layout, ResourceRecord};
use log::debug;

/// Build every record of `kind` found in a configuration dump.
///
/// Records are fully defaulted. A repeated identity reopens the earlier
/// record rather than creating a second one. Singleton kinds always yield
/// exactly one record, absent when no block was found.
pub fn materialize(
    kind: &dyn BlockKind,
    text: &str,
    parents: &ParentIndex,
) -> Result<Vec<ResourceRecord>> {
    let table = kind.fields();
    let mut records: Vec<ResourceRecord> = Vec::new();
    let mut open: Option<usize> = None;

    for event in Classifier::new(kind, text) {
        match event {
            LineEvent::BlockStart { header, line } => {
                let index = match records.iter().position(|r| r.identity == header.identity) {
                    Some(index) => {
                        debug!(
                            "Reopened {} `{}` at line {}",
                            kind.name(),
                            header.identity,
                            line
                        );
                        records[index].attributes.extend(header.attributes);
                        index
                    }
                    None => {
                        records.push(ResourceRecord::from_header(kind.name(), &header, table));
                        records.len() - 1
                    }
                };
                open = Some(index);
            }
            LineEvent::FieldMatch { field, raw, line } => {
                let Some(index) = open else {
                    continue;
                };
                let descriptor = table.require(field)?;
                let slot = records[index]
                    .fields
                    .entry(field.to_string())
                    .or_insert_with(|| descriptor.default.clone());
                descriptor.merge(slot, raw, line)?;
            }
            LineEvent::BlockEnd => open = None,
        }
    }

    if let (true, Layout::Singleton { identity }) = (records.is_empty(), kind.layout()) {
        records.push(ResourceRecord::new(
            kind.name(),
            identity,
            Existence::Absent,
            table,
        ));
    }

    for record in &mut records {
        record.scope = kind.scope(&record.identity, &record.attributes, parents)?;
        debug!(
            "Instantiated {} `{}` ({})",
            kind.name(),
            record.identity,
            record.existence
        );
    }

    Ok(records)
}

/// Scan parents and build records in one go.
pub fn read_records(kind: &dyn BlockKind, text: &str) -> Result<Vec<ResourceRecord>> {
    let parents = ParentIndex::scan(text);
    materialize(kind, text, &parents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::resource::tests::SectionKind;
    use crate::value::Value;

    #[test]
    fn test_no_blocks_no_records() {
        assert!(read_records(&SectionKind, "hostname r1\n!\n").unwrap().is_empty());
    }

    #[test]
    fn test_multi_record_split() {
        let text = r"section a
 description first
 member x
 member y
!
section b
 mode manual
!
";
        let records = read_records(&SectionKind, text).unwrap();
        assert_eq!(records.len(), 2);

        let a = &records[0];
        assert_eq!(a.identity, "a");
        assert_eq!(a.get("description"), Some(&Value::Str("first".into())));
        assert_eq!(a.get("members"), Some(&Value::list(["x", "y"])));
        assert_eq!(a.get("mode"), Some(&Value::symbol("auto")));
        assert_eq!(a.scope, vec!["section a".to_string()]);

        let b = &records[1];
        assert_eq!(b.get("mode"), Some(&Value::symbol("manual")));
        assert_eq!(b.get("shutdown"), Some(&Value::Bool(false)));
        assert_eq!(b.get("members"), Some(&Value::List(vec![])));
    }

    #[test]
    fn test_repeated_identity_reopens_record() {
        let text = "section a\n member x\nsection b\nsection a\n member y\n";
        let records = read_records(&SectionKind, text).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("members"), Some(&Value::list(["x", "y"])));
    }

    #[test]
    fn test_scalars_last_write_wins() {
        let text = "section a\n description one\n description two\n";
        let records = read_records(&SectionKind, text).unwrap();
        assert_eq!(
            records[0].get("description"),
            Some(&Value::Str("two".into()))
        );
    }

    #[test]
    fn test_every_field_is_defaulted() {
        let records = read_records(&SectionKind, "section a\n").unwrap();
        assert_eq!(records[0].fields.len(), 5);
        assert!(records[0].is_present());
    }

    #[test]
    fn test_decode_failure_is_fatal() {
        let err = read_records(&SectionKind, "section a\n mtu jumbo\n").unwrap_err();
        assert!(matches!(
            err,
            Error::TypeDecode {
                field: "mtu",
                line: 2,
                ..
            }
        ));
    }
}
