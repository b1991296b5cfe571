// src/repo/reports.rs

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::AppError;
use crate::models::report::ReportRecord;
use crate::storage::KvStore;

use super::keys;

/// Repository over the durable report collection.
///
/// The whole collection lives as one JSON array under a single key; every
/// mutation re-reads it and writes the full array back. `append_if_absent`
/// is the only writer the exam engine uses and enforces the
/// one-record-per-`(reg_no, subject, class_name)` invariant.
///
/// Known limitation: the check-then-write inside `append_if_absent` is a
/// plain read-modify-write with no locking, so two independent processes
/// submitting for the same key at nearly the same instant can both pass the
/// existence check and both append. Within one process the engine runs on a
/// single cooperative event loop and the sequence is race-free.
pub struct ReportRepository {
    store: Arc<dyn KvStore>,
}

impl ReportRepository {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Reads the full report collection, oldest first.
    pub fn all(&self) -> Result<Vec<ReportRecord>, AppError> {
        match self.store.read(keys::REPORTS)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    fn write_all(&self, reports: &[ReportRecord]) -> Result<(), AppError> {
        let raw = serde_json::to_string(reports)?;
        self.store.write(keys::REPORTS, &raw)
    }

    /// Looks up the record for a `(reg_no, subject, class_name)` key,
    /// compared case-insensitively.
    pub fn find_by_key(
        &self,
        reg_no: &str,
        subject: &str,
        class_name: &str,
    ) -> Result<Option<ReportRecord>, AppError> {
        Ok(self
            .all()?
            .into_iter()
            .find(|r| r.matches_key(reg_no, subject, class_name)))
    }

    /// Appends `record` unless a record with the same key already exists.
    /// Returns `true` if the record was written, `false` if an existing
    /// record won (first-writer-wins).
    pub fn append_if_absent(&self, record: ReportRecord) -> Result<bool, AppError> {
        let mut reports = self.all()?;
        let exists = reports
            .iter()
            .any(|r| r.matches_key(&record.reg_no, &record.subject, &record.class_name));
        if exists {
            tracing::warn!(
                "Report for {}/{}/{} already exists, keeping the first record",
                record.reg_no,
                record.subject,
                record.class_name
            );
            return Ok(false);
        }

        reports.push(record);
        self.write_all(&reports)?;
        Ok(true)
    }

    /// Reports grouped class -> subject, each group sorted by student name.
    ///
    /// Duplicate keys (possible when two devices submitted concurrently, see
    /// the type-level note) are collapsed to the newest record before
    /// grouping.
    pub fn grouped(
        &self,
    ) -> Result<BTreeMap<String, BTreeMap<String, Vec<ReportRecord>>>, AppError> {
        let mut newest: BTreeMap<String, ReportRecord> = BTreeMap::new();
        for report in self.all()? {
            let key = format!(
                "{}-{}-{}",
                report.reg_no.to_lowercase(),
                report.subject.to_lowercase(),
                report.class_name.to_lowercase()
            );
            let newer = match newest.get(&key) {
                Some(existing) => report.date > existing.date,
                None => true,
            };
            if newer {
                newest.insert(key, report);
            }
        }

        let mut grouped: BTreeMap<String, BTreeMap<String, Vec<ReportRecord>>> = BTreeMap::new();
        for report in newest.into_values() {
            grouped
                .entry(report.class_name.clone())
                .or_default()
                .entry(report.subject.clone())
                .or_default()
                .push(report);
        }
        for subjects in grouped.values_mut() {
            for records in subjects.values_mut() {
                records.sort_by(|a, b| a.name.cmp(&b.name));
            }
        }
        Ok(grouped)
    }

    /// Deletes the record for one `(reg_no, subject, class_name)` key.
    pub fn delete_by_key(
        &self,
        reg_no: &str,
        subject: &str,
        class_name: &str,
    ) -> Result<(), AppError> {
        let mut reports = self.all()?;
        reports.retain(|r| !r.matches_key(reg_no, subject, class_name));
        self.write_all(&reports)
    }

    /// Deletes every record for a subject within a class.
    pub fn delete_subject(&self, class_name: &str, subject: &str) -> Result<(), AppError> {
        let mut reports = self.all()?;
        reports.retain(|r| {
            !(r.class_name.eq_ignore_ascii_case(class_name)
                && r.subject.eq_ignore_ascii_case(subject))
        });
        self.write_all(&reports)
    }

    /// Deletes every record for a class.
    pub fn delete_class(&self, class_name: &str) -> Result<(), AppError> {
        let mut reports = self.all()?;
        reports.retain(|r| !r.class_name.eq_ignore_ascii_case(class_name));
        self.write_all(&reports)
    }
}
