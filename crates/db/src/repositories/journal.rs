//! Journal repository for ledger posting, reversal flows, and projections.
//!
//! Every multi-row write (entry + line items + stock mutation + balance cache
//! rebuild, or original-flip + compensating insert) happens inside ONE
//! database transaction. A crash can never leave stock and journal
//! disagreeing.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::debug;
use uuid::Uuid;

use defter_core::ledger::{
    BalanceSummary, Direction, EntryKind, EntryStatus, LedgerError, LineItem, PostEntryInput,
    SettlementKind, StatementEntry, StatementRow, build_rows, ensure_cancellable,
    ensure_returnable, ensure_revertible, ensure_settleable, validate_date_range,
    validate_post_input,
};
use defter_shared::TenantScope;
use defter_shared::types::EntryId;

use super::{db_err, row_in_scope, scope_columns, scope_condition};
use crate::entities::{
    accounts, entry_items, journal_entries, products, sea_orm_active_enums as db_enums,
    stock_movements,
};

/// Filter options for listing journal entries.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    /// Filter by account.
    pub account_id: Option<Uuid>,
    /// Filter by correlation id.
    pub sale_no: Option<String>,
    /// Filter by entry kind.
    pub kind: Option<EntryKind>,
    /// Filter by lifecycle status.
    pub status: Option<EntryStatus>,
    /// Filter by date range start.
    pub date_from: Option<chrono::NaiveDate>,
    /// Filter by date range end.
    pub date_to: Option<chrono::NaiveDate>,
}

/// A journal entry with its line items.
#[derive(Debug, Clone)]
pub struct EntryWithItems {
    /// The journal entry.
    pub entry: journal_entries::Model,
    /// Line items.
    pub items: Vec<entry_items::Model>,
}

/// Result of posting a forward entry.
#[derive(Debug, Clone)]
pub struct PostedEntry {
    /// The posted entry.
    pub entry: journal_entries::Model,
    /// Line items.
    pub items: Vec<entry_items::Model>,
    /// Partial-payment entry posted under the same sale_no, if any.
    pub payment: Option<journal_entries::Model>,
}

/// Input for a sale return.
#[derive(Debug, Clone)]
pub struct ReturnInput {
    /// Returned amount (positive).
    pub amount: Decimal,
    /// Returned line items.
    pub items: Vec<LineItem>,
    /// Commercial date; defaults to today.
    pub entry_date: Option<chrono::NaiveDate>,
    /// Free-text annotation.
    pub note: Option<String>,
    /// Settle immediately with this method.
    pub settlement: Option<SettlementKind>,
}

/// Result of a sale return.
#[derive(Debug, Clone)]
pub struct ReturnOutcome {
    /// The sale_return entry.
    pub entry: journal_entries::Model,
    /// Returned line items.
    pub items: Vec<entry_items::Model>,
    /// Settlement payment, when settled in the same call.
    pub settlement: Option<journal_entries::Model>,
}

/// Column values for a fresh journal row.
struct NewEntry {
    scope: TenantScope,
    account_id: Uuid,
    kind: EntryKind,
    direction: Direction,
    amount: Decimal,
    currency: String,
    fx_rate: Decimal,
    entry_date: chrono::NaiveDate,
    sale_no: Option<String>,
    ref_entry_id: Option<Uuid>,
    settlement: Option<SettlementKind>,
    note: Option<String>,
}

/// Journal repository for ledger operations.
#[derive(Debug, Clone)]
pub struct JournalRepository {
    db: DatabaseConnection,
}

impl JournalRepository {
    /// Creates a new journal repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    // ========================================================================
    // Posting
    // ========================================================================

    /// Posts a forward entry (sale, purchase, or payment).
    ///
    /// One transaction covers the journal insert, line items, stock mutation
    /// with movement log rows, the optional partial-payment entry, and the
    /// account balance-cache rebuild.
    ///
    /// # Errors
    ///
    /// Returns validation errors from the input, `AccountNotFound`/
    /// `AccountForbidden` for a bad account reference, `ProductNotFound` for
    /// a bad line item, or `Database` on store failure.
    pub async fn post_entry(
        &self,
        scope: TenantScope,
        input: PostEntryInput,
    ) -> Result<PostedEntry, LedgerError> {
        validate_post_input(&input)?;
        let account = self.require_account(scope, input.account_id).await?;

        let txn = self.db.begin().await.map_err(db_err)?;

        let entry = insert_entry(
            &txn,
            NewEntry {
                scope,
                account_id: account.id,
                kind: input.kind,
                direction: input.kind.natural_direction(),
                amount: input.amount,
                currency: input.currency.clone(),
                fx_rate: input.fx_rate,
                entry_date: input.entry_date,
                sale_no: input.sale_no.clone(),
                ref_entry_id: None,
                settlement: None,
                note: input.note.clone(),
            },
        )
        .await?;

        let items = insert_items(&txn, entry.id, &input.items).await?;

        if let Some(sign) = input.kind.stock_sign() {
            let reason = stock_reason_for(input.kind);
            for item in &input.items {
                apply_stock(
                    &txn,
                    scope,
                    item.product_id,
                    item.quantity * Decimal::from(sign),
                    reason.clone(),
                    Some(entry.id),
                )
                .await?;
            }
        }

        // Partial payment on a sale: second entry under the same sale_no.
        let payment = if let Some(paid) = input.paid_amount {
            Some(
                insert_entry(
                    &txn,
                    NewEntry {
                        scope,
                        account_id: account.id,
                        kind: EntryKind::Payment,
                        direction: EntryKind::Payment.natural_direction(),
                        amount: paid,
                        currency: input.currency.clone(),
                        fx_rate: input.fx_rate,
                        entry_date: input.entry_date,
                        sale_no: input.sale_no.clone(),
                        ref_entry_id: Some(entry.id),
                        settlement: None,
                        note: None,
                    },
                )
                .await?,
            )
        } else {
            None
        };

        rebuild_balance(&txn, account.id).await?;
        txn.commit().await.map_err(db_err)?;

        Ok(PostedEntry {
            entry,
            items,
            payment,
        })
    }

    // ========================================================================
    // Projections
    // ========================================================================

    /// Computes `{borc, alacak, bakiye}` for an account.
    ///
    /// Folds all non-deleted entries in scope and range; recomputed from the
    /// journal on every call, the cached account balance is never consulted.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange`, account scope errors, or `Database`.
    pub async fn compute_balance(
        &self,
        scope: TenantScope,
        account_id: Uuid,
        from: Option<chrono::NaiveDate>,
        to: Option<chrono::NaiveDate>,
    ) -> Result<BalanceSummary, LedgerError> {
        validate_date_range(from, to)?;
        self.require_account(scope, account_id).await?;

        let entries = self.fetch_account_entries(scope, account_id, from, to).await?;

        Ok(BalanceSummary::from_entries(entries.into_iter().map(|e| {
            (Direction::from(e.direction), e.amount)
        })))
    }

    /// Builds the account statement (ekstre) with a per-row running bakiye.
    ///
    /// Rows are ordered by entry date ascending, creation order as tiebreak;
    /// the running fold is the same one `compute_balance` uses.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange`, account scope errors, or `Database`.
    pub async fn statement(
        &self,
        scope: TenantScope,
        account_id: Uuid,
        from: Option<chrono::NaiveDate>,
        to: Option<chrono::NaiveDate>,
    ) -> Result<Vec<StatementRow>, LedgerError> {
        validate_date_range(from, to)?;
        self.require_account(scope, account_id).await?;

        let entries = self.fetch_account_entries(scope, account_id, from, to).await?;

        let statement_entries = entries
            .into_iter()
            .map(|e| StatementEntry {
                id: EntryId::from_uuid(e.id),
                entry_date: e.entry_date,
                kind: e.kind.into(),
                direction: e.direction.into(),
                amount: e.amount,
                sale_no: e.sale_no,
            })
            .collect();

        Ok(build_rows(statement_entries))
    }

    /// Lists journal entries in scope with optional filters, newest first.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` or `Database`.
    pub async fn list_entries(
        &self,
        scope: TenantScope,
        filter: EntryFilter,
    ) -> Result<Vec<journal_entries::Model>, LedgerError> {
        validate_date_range(filter.date_from, filter.date_to)?;

        let mut query = journal_entries::Entity::find().filter(scope_condition(
            scope,
            journal_entries::Column::CompanyId,
            journal_entries::Column::LegacyUserId,
        ));

        if let Some(account_id) = filter.account_id {
            query = query.filter(journal_entries::Column::AccountId.eq(account_id));
        }
        if let Some(sale_no) = filter.sale_no {
            query = query.filter(journal_entries::Column::SaleNo.eq(sale_no));
        }
        if let Some(kind) = filter.kind {
            query = query.filter(journal_entries::Column::Kind.eq(db_enums::EntryKind::from(kind)));
        }
        if let Some(status) = filter.status {
            query = query
                .filter(journal_entries::Column::Status.eq(db_enums::EntryStatus::from(status)));
        }
        if let Some(from) = filter.date_from {
            query = query.filter(journal_entries::Column::EntryDate.gte(from));
        }
        if let Some(to) = filter.date_to {
            query = query.filter(journal_entries::Column::EntryDate.lte(to));
        }

        query
            .order_by_desc(journal_entries::Column::EntryDate)
            .order_by_desc(journal_entries::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)
    }

    /// Gets a journal entry with its line items.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` or `Database`.
    pub async fn get_entry(
        &self,
        scope: TenantScope,
        entry_id: Uuid,
    ) -> Result<EntryWithItems, LedgerError> {
        let entry = self.require_entry(scope, entry_id).await?;
        let items = entry_items::Entity::find()
            .filter(entry_items::Column::EntryId.eq(entry.id))
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(EntryWithItems { entry, items })
    }

    // ========================================================================
    // Reversal flows
    // ========================================================================

    /// Cancels a forward entry by posting a compensating entry.
    ///
    /// The original flips to `cancelled` but stays in the balance fold; the
    /// compensating entry (inverted direction, same amount) nets it out. The
    /// original's stock effect is reversed in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound`, `NotCancellable` for reversal kinds,
    /// `AlreadyCancelled` for non-active entries, or `Database`.
    pub async fn cancel_entry(
        &self,
        scope: TenantScope,
        entry_id: Uuid,
    ) -> Result<journal_entries::Model, LedgerError> {
        let original = self.require_entry(scope, entry_id).await?;
        let kind = EntryKind::from(original.kind.clone());
        let status = EntryStatus::from(original.status.clone());
        let reversal_kind = ensure_cancellable(original.id, kind, status)?;

        let original_items = entry_items::Entity::find()
            .filter(entry_items::Column::EntryId.eq(original.id))
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let txn = self.db.begin().await.map_err(db_err)?;

        let reversal = insert_entry(
            &txn,
            NewEntry {
                scope,
                account_id: original.account_id,
                kind: reversal_kind,
                direction: Direction::from(original.direction.clone()).opposite(),
                amount: original.amount,
                currency: original.currency.clone(),
                fx_rate: original.fx_rate,
                entry_date: Utc::now().date_naive(),
                sale_no: original.sale_no.clone(),
                ref_entry_id: Some(original.id),
                settlement: None,
                note: None,
            },
        )
        .await?;

        let mut active: journal_entries::ActiveModel = original.clone().into();
        active.status = Set(db_enums::EntryStatus::Cancelled);
        active.update(&txn).await.map_err(db_err)?;

        if let Some(sign) = reversal_kind.stock_sign() {
            let reason = stock_reason_for(reversal_kind);
            for item in &original_items {
                apply_stock(
                    &txn,
                    scope,
                    item.product_id,
                    item.quantity * Decimal::from(sign),
                    reason.clone(),
                    Some(reversal.id),
                )
                .await?;
            }
        }

        rebuild_balance(&txn, original.account_id).await?;
        txn.commit().await.map_err(db_err)?;

        Ok(reversal)
    }

    /// Reverts a cancel ("geri al"), re-activating the original entry.
    ///
    /// The cancel entry becomes `reversed` and soft-deleted; the original
    /// returns to `active` and its stock effect is re-applied. Only one level
    /// of revert exists; a second attempt conflicts.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound`, `NotACancelEntry`, `AlreadyReverted`, or
    /// `Database`.
    pub async fn revert_cancel(
        &self,
        scope: TenantScope,
        cancel_entry_id: Uuid,
    ) -> Result<journal_entries::Model, LedgerError> {
        let cancel = self.require_entry(scope, cancel_entry_id).await?;
        ensure_revertible(
            cancel.id,
            EntryKind::from(cancel.kind.clone()),
            EntryStatus::from(cancel.status.clone()),
        )?;

        let original_id = cancel
            .ref_entry_id
            .ok_or_else(|| LedgerError::Internal("cancel entry without back-reference".into()))?;
        let original = self.require_entry(scope, original_id).await?;
        let original_kind = EntryKind::from(original.kind.clone());

        let original_items = entry_items::Entity::find()
            .filter(entry_items::Column::EntryId.eq(original.id))
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let txn = self.db.begin().await.map_err(db_err)?;

        let mut active: journal_entries::ActiveModel = original.clone().into();
        active.status = Set(db_enums::EntryStatus::Active);
        active.is_deleted = Set(false);
        let restored = active.update(&txn).await.map_err(db_err)?;

        let mut active: journal_entries::ActiveModel = cancel.clone().into();
        active.status = Set(db_enums::EntryStatus::Reversed);
        active.is_deleted = Set(true);
        active.update(&txn).await.map_err(db_err)?;

        if let Some(sign) = original_kind.stock_sign() {
            for item in &original_items {
                apply_stock(
                    &txn,
                    scope,
                    item.product_id,
                    item.quantity * Decimal::from(sign),
                    db_enums::StockReason::Revert,
                    Some(original.id),
                )
                .await?;
            }
        }

        rebuild_balance(&txn, original.account_id).await?;
        txn.commit().await.map_err(db_err)?;

        Ok(restored)
    }

    /// Posts a sale return, optionally settling it in the same transaction.
    ///
    /// The return entry posts opposite to the sale and increments stock for
    /// the returned items. An immediate settlement posts the compensating
    /// payment as well.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound`, `NotASale`, `AlreadyCancelled` for a
    /// non-active sale, `AmountNotPositive`/`MissingItems` for a bad payload,
    /// or `Database`.
    pub async fn return_sale(
        &self,
        scope: TenantScope,
        sale_entry_id: Uuid,
        input: ReturnInput,
    ) -> Result<ReturnOutcome, LedgerError> {
        let sale = self.require_entry(scope, sale_entry_id).await?;
        ensure_returnable(
            sale.id,
            EntryKind::from(sale.kind.clone()),
            EntryStatus::from(sale.status.clone()),
        )?;

        if input.amount <= Decimal::ZERO {
            return Err(LedgerError::AmountNotPositive);
        }
        if input.items.is_empty() {
            return Err(LedgerError::MissingItems(EntryKind::SaleReturn));
        }
        for item in &input.items {
            if item.quantity <= Decimal::ZERO || item.unit_price < Decimal::ZERO {
                return Err(LedgerError::AmountNotPositive);
            }
        }

        let entry_date = input.entry_date.unwrap_or_else(|| Utc::now().date_naive());
        let txn = self.db.begin().await.map_err(db_err)?;

        let return_entry = insert_entry(
            &txn,
            NewEntry {
                scope,
                account_id: sale.account_id,
                kind: EntryKind::SaleReturn,
                direction: EntryKind::SaleReturn.natural_direction(),
                amount: input.amount,
                currency: sale.currency.clone(),
                fx_rate: sale.fx_rate,
                entry_date,
                sale_no: sale.sale_no.clone(),
                ref_entry_id: Some(sale.id),
                settlement: None,
                note: input.note.clone(),
            },
        )
        .await?;

        let items = insert_items(&txn, return_entry.id, &input.items).await?;

        for item in &input.items {
            apply_stock(
                &txn,
                scope,
                item.product_id,
                item.quantity,
                db_enums::StockReason::SaleReturn,
                Some(return_entry.id),
            )
            .await?;
        }

        let settlement = if let Some(method) = input.settlement {
            Some(
                insert_settlement(
                    &txn,
                    scope,
                    &return_entry,
                    method,
                    entry_date,
                )
                .await?,
            )
        } else {
            None
        };

        rebuild_balance(&txn, sale.account_id).await?;
        txn.commit().await.map_err(db_err)?;

        Ok(ReturnOutcome {
            entry: return_entry,
            items,
            settlement,
        })
    }

    /// Settles a sale return with a refund or offset payment.
    ///
    /// A return takes exactly one active settlement; the second attempt
    /// conflicts regardless of method, so a return can never be both refunded
    /// and offset.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound`, `NotAReturn`, `AlreadySettled`, or
    /// `Database`.
    pub async fn settle_return(
        &self,
        scope: TenantScope,
        return_entry_id: Uuid,
        method: SettlementKind,
    ) -> Result<journal_entries::Model, LedgerError> {
        let return_entry = self.require_entry(scope, return_entry_id).await?;
        let has_settlement = self.has_active_settlement(return_entry.id).await?;
        ensure_settleable(
            return_entry.id,
            EntryKind::from(return_entry.kind.clone()),
            EntryStatus::from(return_entry.status.clone()),
            has_settlement,
        )?;

        let txn = self.db.begin().await.map_err(db_err)?;
        let settlement = insert_settlement(
            &txn,
            scope,
            &return_entry,
            method,
            Utc::now().date_naive(),
        )
        .await?;
        rebuild_balance(&txn, return_entry.account_id).await?;
        txn.commit().await.map_err(db_err)?;

        Ok(settlement)
    }

    // ========================================================================
    // Internal helpers
    // ========================================================================

    /// Loads an account, enforcing scope ownership.
    async fn require_account(
        &self,
        scope: TenantScope,
        account_id: Uuid,
    ) -> Result<accounts::Model, LedgerError> {
        let account = accounts::Entity::find_by_id(account_id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(LedgerError::AccountNotFound(account_id))?;

        if !row_in_scope(account.company_id, account.legacy_user_id, scope) {
            return Err(LedgerError::AccountForbidden(account_id));
        }

        Ok(account)
    }

    /// Loads a journal entry, enforcing scope ownership.
    ///
    /// Entries under a different tenant are reported as not found; the
    /// journal never confirms foreign row existence.
    async fn require_entry(
        &self,
        scope: TenantScope,
        entry_id: Uuid,
    ) -> Result<journal_entries::Model, LedgerError> {
        let entry = journal_entries::Entity::find_by_id(entry_id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(LedgerError::EntryNotFound(entry_id))?;

        if !row_in_scope(entry.company_id, entry.legacy_user_id, scope) {
            return Err(LedgerError::EntryNotFound(entry_id));
        }

        Ok(entry)
    }

    /// Fetches the balance/statement input rows for an account.
    async fn fetch_account_entries(
        &self,
        scope: TenantScope,
        account_id: Uuid,
        from: Option<chrono::NaiveDate>,
        to: Option<chrono::NaiveDate>,
    ) -> Result<Vec<journal_entries::Model>, LedgerError> {
        let mut query = journal_entries::Entity::find()
            .filter(scope_condition(
                scope,
                journal_entries::Column::CompanyId,
                journal_entries::Column::LegacyUserId,
            ))
            .filter(journal_entries::Column::AccountId.eq(account_id))
            .filter(journal_entries::Column::IsDeleted.eq(false));

        if let Some(from) = from {
            query = query.filter(journal_entries::Column::EntryDate.gte(from));
        }
        if let Some(to) = to {
            query = query.filter(journal_entries::Column::EntryDate.lte(to));
        }

        query
            .order_by_asc(journal_entries::Column::EntryDate)
            .order_by_asc(journal_entries::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)
    }

    /// Checks whether an active settlement already references a return.
    async fn has_active_settlement(&self, return_entry_id: Uuid) -> Result<bool, LedgerError> {
        let count = journal_entries::Entity::find()
            .filter(journal_entries::Column::RefEntryId.eq(return_entry_id))
            .filter(journal_entries::Column::Settlement.is_not_null())
            .filter(journal_entries::Column::IsDeleted.eq(false))
            .filter(journal_entries::Column::Status.eq(db_enums::EntryStatus::Active))
            .count(&self.db)
            .await
            .map_err(db_err)?;

        Ok(count > 0)
    }
}

// ============================================================================
// Transaction-scoped helpers
// ============================================================================

/// Inserts a journal row.
async fn insert_entry(
    txn: &DatabaseTransaction,
    new: NewEntry,
) -> Result<journal_entries::Model, LedgerError> {
    let (company_id, legacy_user_id) = scope_columns(new.scope);

    let entry = journal_entries::ActiveModel {
        id: Set(Uuid::new_v4()),
        company_id: Set(company_id),
        legacy_user_id: Set(legacy_user_id),
        account_id: Set(new.account_id),
        kind: Set(new.kind.into()),
        direction: Set(new.direction.into()),
        amount: Set(new.amount),
        currency: Set(new.currency),
        fx_rate: Set(new.fx_rate),
        entry_date: Set(new.entry_date),
        sale_no: Set(new.sale_no),
        ref_entry_id: Set(new.ref_entry_id),
        status: Set(db_enums::EntryStatus::Active),
        is_deleted: Set(false),
        settlement: Set(new.settlement.map(Into::into)),
        note: Set(new.note),
        created_at: Set(Utc::now().into()),
    };

    entry.insert(txn).await.map_err(db_err)
}

/// Inserts line items for an entry.
async fn insert_items(
    txn: &DatabaseTransaction,
    entry_id: Uuid,
    items: &[LineItem],
) -> Result<Vec<entry_items::Model>, LedgerError> {
    let now = Utc::now().into();
    let mut result = Vec::with_capacity(items.len());

    for item in items {
        let row = entry_items::ActiveModel {
            id: Set(Uuid::new_v4()),
            entry_id: Set(entry_id),
            product_id: Set(item.product_id),
            quantity: Set(item.quantity),
            unit_price: Set(item.unit_price),
            created_at: Set(now),
        };
        result.push(row.insert(txn).await.map_err(db_err)?);
    }

    Ok(result)
}

/// Posts the compensating payment that settles a sale return.
async fn insert_settlement(
    txn: &DatabaseTransaction,
    scope: TenantScope,
    return_entry: &journal_entries::Model,
    method: SettlementKind,
    entry_date: chrono::NaiveDate,
) -> Result<journal_entries::Model, LedgerError> {
    insert_entry(
        txn,
        NewEntry {
            scope,
            account_id: return_entry.account_id,
            kind: EntryKind::Payment,
            // The settlement nets against the return, so it posts opposite.
            direction: Direction::from(return_entry.direction.clone()).opposite(),
            amount: return_entry.amount,
            currency: return_entry.currency.clone(),
            fx_rate: return_entry.fx_rate,
            entry_date,
            sale_no: return_entry.sale_no.clone(),
            ref_entry_id: Some(return_entry.id),
            settlement: Some(method),
            note: None,
        },
    )
    .await
}

/// Mutates a product's on-hand quantity and logs the movement.
async fn apply_stock(
    txn: &DatabaseTransaction,
    scope: TenantScope,
    product_id: Uuid,
    delta: Decimal,
    reason: db_enums::StockReason,
    entry_id: Option<Uuid>,
) -> Result<(), LedgerError> {
    let product = products::Entity::find_by_id(product_id)
        .one(txn)
        .await
        .map_err(db_err)?
        .ok_or(LedgerError::ProductNotFound(product_id))?;

    if !row_in_scope(product.company_id, product.legacy_user_id, scope) {
        return Err(LedgerError::ProductNotFound(product_id));
    }

    let on_hand = product.on_hand + delta;
    let mut active: products::ActiveModel = product.into();
    active.on_hand = Set(on_hand);
    active.updated_at = Set(Utc::now().into());
    active.update(txn).await.map_err(db_err)?;

    let movement = stock_movements::ActiveModel {
        id: Set(Uuid::new_v4()),
        product_id: Set(product_id),
        entry_id: Set(entry_id),
        delta: Set(delta),
        reason: Set(reason),
        created_at: Set(Utc::now().into()),
    };
    movement.insert(txn).await.map_err(db_err)?;

    Ok(())
}

/// Rebuilds the account's cached balance from the journal.
///
/// The journal is the single source of truth; this cache is only ever
/// written here, inside the same transaction as the journal mutation.
async fn rebuild_balance(
    txn: &DatabaseTransaction,
    account_id: Uuid,
) -> Result<(), LedgerError> {
    let entries = journal_entries::Entity::find()
        .filter(journal_entries::Column::AccountId.eq(account_id))
        .filter(journal_entries::Column::IsDeleted.eq(false))
        .all(txn)
        .await
        .map_err(db_err)?;

    let summary = BalanceSummary::from_entries(
        entries
            .into_iter()
            .map(|e| (Direction::from(e.direction), e.amount)),
    );

    debug!(account_id = %account_id, bakiye = %summary.bakiye, "rebuilt balance cache");

    let account = accounts::Entity::find_by_id(account_id)
        .one(txn)
        .await
        .map_err(db_err)?
        .ok_or(LedgerError::AccountNotFound(account_id))?;

    let mut active: accounts::ActiveModel = account.into();
    active.balance = Set(summary.bakiye);
    active.updated_at = Set(Utc::now().into());
    active.update(txn).await.map_err(db_err)?;

    Ok(())
}

/// Stock movement reason for an entry kind.
fn stock_reason_for(kind: EntryKind) -> db_enums::StockReason {
    match kind {
        EntryKind::Sale => db_enums::StockReason::Sale,
        EntryKind::SaleReturn => db_enums::StockReason::SaleReturn,
        EntryKind::SaleCancel => db_enums::StockReason::SaleCancel,
        EntryKind::Purchase => db_enums::StockReason::Purchase,
        EntryKind::PurchaseCancel => db_enums::StockReason::PurchaseCancel,
        EntryKind::Payment | EntryKind::PaymentCancel => db_enums::StockReason::Adjustment,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_reason_mapping() {
        assert_eq!(
            stock_reason_for(EntryKind::Sale),
            db_enums::StockReason::Sale
        );
        assert_eq!(
            stock_reason_for(EntryKind::SaleCancel),
            db_enums::StockReason::SaleCancel
        );
        assert_eq!(
            stock_reason_for(EntryKind::PurchaseCancel),
            db_enums::StockReason::PurchaseCancel
        );
    }

    #[test]
    fn test_entry_filter_default_is_empty() {
        let filter = EntryFilter::default();
        assert!(filter.account_id.is_none());
        assert!(filter.sale_no.is_none());
        assert!(filter.kind.is_none());
        assert!(filter.status.is_none());
    }
}
