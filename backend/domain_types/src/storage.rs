//! Generic persistence boundary for the vendor records.
//!
//! Concrete schema and migration mechanics live elsewhere; the processor only
//! needs create/update/query plus an atomic commit for one reconciliation.

use std::{
    collections::HashMap,
    sync::atomic::{AtomicI64, Ordering},
    sync::Mutex,
};

use error_stack::report;

use crate::{
    date_time,
    errors::{CustomResult, StorageError},
    records::{Invoice, Payment, Receipt},
};

/// Everything one reconciliation step writes. Persisted as a single unit of
/// work so a payment can never be marked successful while the invoice status
/// lags behind.
#[derive(Debug, Default)]
pub struct ReconciliationUnit {
    pub invoice: Option<Invoice>,
    pub payments: Vec<Payment>,
    pub receipts: Vec<Receipt>,
}

pub trait VendorStorage: Send + Sync {
    /// Atomically upsert every record in `unit`. Records with `id == 0` are
    /// assigned fresh ids.
    fn commit_reconciliation(
        &self,
        unit: ReconciliationUnit,
    ) -> CustomResult<ReconciliationUnit, StorageError>;

    fn get_invoice(&self, id: i64) -> CustomResult<Option<Invoice>, StorageError>;

    fn get_payment(&self, id: i64) -> CustomResult<Option<Payment>, StorageError>;

    fn get_receipt(&self, id: i64) -> CustomResult<Option<Receipt>, StorageError>;

    fn payments_for_invoice(&self, invoice_id: i64) -> CustomResult<Vec<Payment>, StorageError>;

    fn receipts_for_profile(&self, profile_id: i64) -> CustomResult<Vec<Receipt>, StorageError>;
}

#[derive(Default)]
struct Tables {
    invoices: HashMap<i64, Invoice>,
    payments: HashMap<i64, Payment>,
    receipts: HashMap<i64, Receipt>,
}

/// Mutex-guarded in-memory store. One lock spans the whole reconciliation
/// commit, which is what makes the unit of work atomic here.
#[derive(Default)]
pub struct InMemoryStorage {
    tables: Mutex<Tables>,
    next_id: AtomicI64,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
            next_id: AtomicI64::new(1),
        }
    }

    fn assign_id(&self, id: i64) -> i64 {
        if id != 0 {
            return id;
        }
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    fn lock(&self) -> CustomResult<std::sync::MutexGuard<'_, Tables>, StorageError> {
        self.tables
            .lock()
            .map_err(|_| report!(StorageError::Unavailable))
    }
}

impl VendorStorage for InMemoryStorage {
    fn commit_reconciliation(
        &self,
        mut unit: ReconciliationUnit,
    ) -> CustomResult<ReconciliationUnit, StorageError> {
        let mut tables = self.lock()?;
        let now = date_time::now();

        if let Some(invoice) = unit.invoice.as_mut() {
            invoice.id = self.assign_id(invoice.id);
            invoice.updated = now;
            tables.invoices.insert(invoice.id, invoice.clone());
        }
        for payment in unit.payments.iter_mut() {
            payment.id = self.assign_id(payment.id);
            payment.updated = now;
            tables.payments.insert(payment.id, payment.clone());
        }
        for receipt in unit.receipts.iter_mut() {
            receipt.id = self.assign_id(receipt.id);
            receipt.updated = now;
            tables.receipts.insert(receipt.id, receipt.clone());
        }

        Ok(unit)
    }

    fn get_invoice(&self, id: i64) -> CustomResult<Option<Invoice>, StorageError> {
        Ok(self.lock()?.invoices.get(&id).cloned())
    }

    fn get_payment(&self, id: i64) -> CustomResult<Option<Payment>, StorageError> {
        Ok(self.lock()?.payments.get(&id).cloned())
    }

    fn get_receipt(&self, id: i64) -> CustomResult<Option<Receipt>, StorageError> {
        Ok(self.lock()?.receipts.get(&id).cloned())
    }

    fn payments_for_invoice(&self, invoice_id: i64) -> CustomResult<Vec<Payment>, StorageError> {
        let tables = self.lock()?;
        let mut payments: Vec<Payment> = tables
            .payments
            .values()
            .filter(|p| p.invoice_id == invoice_id)
            .cloned()
            .collect();
        payments.sort_by_key(|p| p.id);
        Ok(payments)
    }

    fn receipts_for_profile(&self, profile_id: i64) -> CustomResult<Vec<Receipt>, StorageError> {
        let tables = self.lock()?;
        let mut receipts: Vec<Receipt> = tables
            .receipts
            .values()
            .filter(|r| r.profile_id == profile_id)
            .cloned()
            .collect();
        receipts.sort_by_key(|r| r.id);
        Ok(receipts)
    }
}
