//! Record service: writes that keep derived fields and ledgers consistent.

use chrono::Utc;
use serde_json::{Map, Value};

use quarry_ledger_core::{
    BatchKind, Collection, DocumentId, FormulaTable, VendorAccount, append_received_amount,
    derive_record,
};

use super::before_change;
use crate::db::DocumentStore;
use crate::error::AppError;
use crate::models::document::strip_reserved;
use crate::models::{Document, ReceivedAmountRequest};

/// Service for creating and changing documents.
pub struct RecordService<'a> {
    store: &'a DocumentStore,
    formulas: FormulaTable,
}

impl<'a> RecordService<'a> {
    /// Create a new record service.
    #[must_use]
    pub const fn new(store: &'a DocumentStore, formulas: FormulaTable) -> Self {
        Self { store, formulas }
    }

    /// Create a document, running the before-change hook first.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` if `body` is not a JSON object,
    /// `AppError::InvalidInput` if the hook rejects it, and
    /// `AppError::Database` if the insert fails.
    pub async fn create(&self, collection: Collection, body: Value) -> Result<Document, AppError> {
        let mut data = into_fields(body)?;
        strip_reserved(&mut data);
        let data = before_change(collection, self.formulas, data)?;

        let document = self.store.create(collection, data).await?;
        tracing::info!(collection = %collection, id = %document.id, "Document created");
        Ok(document)
    }

    /// Shallow-merge `patch` into a document and re-run the hook on the result.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` for an unknown document, and otherwise the
    /// same errors as [`Self::create`]. Nothing is written on error.
    pub async fn update(
        &self,
        collection: Collection,
        id: DocumentId,
        patch: Value,
    ) -> Result<Document, AppError> {
        let mut patch = into_fields(patch)?;
        strip_reserved(&mut patch);
        let formulas = self.formulas;

        let document = self
            .store
            .modify(collection, id, move |mut data| {
                data.extend(patch);
                Ok(before_change(collection, formulas, data)?)
            })
            .await?;
        tracing::info!(collection = %collection, id = %id, "Document updated");
        Ok(document)
    }

    /// Append one received amount to a vendor, party or batch ledger.
    ///
    /// The append happens inside [`DocumentStore::modify`], so concurrent
    /// appends to one document are applied one after the other. Batch
    /// documents have their remaining payment recomputed in the same step.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the collection keeps no ledger or the
    /// document does not exist.
    pub async fn append_received_amount(
        &self,
        collection: Collection,
        id: DocumentId,
        payment: ReceivedAmountRequest,
    ) -> Result<Document, AppError> {
        if !collection.tracks_payments() {
            return Err(AppError::NotFound(format!(
                "{collection} do not record received amounts"
            )));
        }

        let formulas = self.formulas;
        let date = payment.date.unwrap_or_else(|| Utc::now().date_naive());
        let amount = payment.amount;

        let document = self
            .store
            .modify(collection, id, move |mut data| {
                let account = VendorAccount::from_record(&data);
                append_received_amount(&account, amount, Some(date), payment.description)
                    .merge_into_record(&mut data)?;
                Ok(before_change(collection, formulas, data)?)
            })
            .await?;

        tracing::info!(
            collection = %collection,
            id = %id,
            amount = %amount,
            "Received amount recorded"
        );
        Ok(document)
    }

    /// Compute the derived fields of a batch record without storing it.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` if the record is rejected.
    pub fn preview(&self, kind: BatchKind, body: &Value) -> Result<Value, AppError> {
        Ok(derive_record(kind, self.formulas.formula_for(kind), body)?)
    }
}

fn into_fields(body: Value) -> Result<Map<String, Value>, AppError> {
    match body {
        Value::Object(fields) => Ok(fields),
        _ => Err(AppError::BadRequest(
            "request body must be a JSON object".to_string(),
        )),
    }
}
