// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{sync::Arc, time::Duration};

use crate::blockchain::LedgerClient;
use crate::storage::TransactionStore;
use crate::submission::SubmissionService;

/// Process-wide state shared by all handlers, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<dyn LedgerClient>,
    pub store: Arc<dyn TransactionStore>,
    pub submissions: Arc<SubmissionService>,
    pub ledger_timeout: Duration,
}

impl AppState {
    pub fn new(
        ledger: Arc<dyn LedgerClient>,
        store: Arc<dyn TransactionStore>,
        ledger_timeout: Duration,
    ) -> Self {
        let submissions = Arc::new(SubmissionService::new(
            Arc::clone(&ledger),
            Arc::clone(&store),
            ledger_timeout,
        ));
        Self {
            ledger,
            store,
            submissions,
            ledger_timeout,
        }
    }
}
