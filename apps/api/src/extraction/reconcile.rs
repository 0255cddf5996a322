use std::collections::HashMap;

use crate::extraction::models::{ContactRecord, DelinquencyRecord, MergedRecord};

/// Joins delinquency records with contact records by `unit`.
///
/// Output has one record per delinquency record, in input order. Units are
/// compared exactly (case-sensitive, no trimming). When several contacts
/// share a unit the first one wins. A record without a unit never matches.
pub fn reconcile(
    delinquency: &[DelinquencyRecord],
    contacts: &[ContactRecord],
) -> Vec<MergedRecord> {
    let mut by_unit: HashMap<&str, &ContactRecord> = HashMap::with_capacity(contacts.len());
    for contact in contacts {
        if let Some(unit) = contact.unit.as_deref() {
            by_unit.entry(unit).or_insert(contact);
        }
    }

    delinquency
        .iter()
        .map(|record| {
            let contact = record
                .unit
                .as_deref()
                .and_then(|unit| by_unit.get(unit).copied());

            MergedRecord {
                unit: record.unit.clone(),
                name: record.name.clone(),
                email: contact.and_then(|c| non_blank(&c.email)),
                phone: contact.and_then(|c| non_blank(&c.phone)),
            }
        })
        .collect()
}

/// Empty strings carry no contact information and are reported as null.
fn non_blank(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}
