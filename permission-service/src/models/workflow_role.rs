//! Workflow role registry - stage keys of the multi-signature verification chains.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::services::error::{AccessError, CatalogEntry};

/// Verification chain. Each chain is an ordered sequence of stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkflowChain {
    CashVerification,
    GoodsReceiving,
    GoodsCosting,
    StockAudit,
}

/// Stage key a staff member can be delegated to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkflowRoleKey {
    CashCounter,
    CashVerifier,
    CashApprover,
    GoodsReceiver,
    GoodsVerifier,
    GoodsApprover,
    CostingPreparer,
    CostingApprover,
    StockCounter,
    StockVerifier,
    StockApprover,
}

struct StageEntry {
    key: WorkflowRoleKey,
    chain: WorkflowChain,
    stage: u8,
    name: &'static str,
    label: &'static str,
}

// Indexed by discriminant; see test_registry_rows_match_discriminants.
#[rustfmt::skip]
static REGISTRY: [StageEntry; 11] = [
    StageEntry { key: WorkflowRoleKey::CashCounter, chain: WorkflowChain::CashVerification, stage: 1, name: "cash-counter", label: "Cash Counter" },
    StageEntry { key: WorkflowRoleKey::CashVerifier, chain: WorkflowChain::CashVerification, stage: 2, name: "cash-verifier", label: "Cash Verifier" },
    StageEntry { key: WorkflowRoleKey::CashApprover, chain: WorkflowChain::CashVerification, stage: 3, name: "cash-approver", label: "Cash Approver" },
    StageEntry { key: WorkflowRoleKey::GoodsReceiver, chain: WorkflowChain::GoodsReceiving, stage: 1, name: "goods-receiver", label: "Goods Receiver" },
    StageEntry { key: WorkflowRoleKey::GoodsVerifier, chain: WorkflowChain::GoodsReceiving, stage: 2, name: "goods-verifier", label: "Goods Verifier" },
    StageEntry { key: WorkflowRoleKey::GoodsApprover, chain: WorkflowChain::GoodsReceiving, stage: 3, name: "goods-approver", label: "Goods Approver" },
    StageEntry { key: WorkflowRoleKey::CostingPreparer, chain: WorkflowChain::GoodsCosting, stage: 1, name: "costing-preparer", label: "Costing Preparer" },
    StageEntry { key: WorkflowRoleKey::CostingApprover, chain: WorkflowChain::GoodsCosting, stage: 2, name: "costing-approver", label: "Costing Approver" },
    StageEntry { key: WorkflowRoleKey::StockCounter, chain: WorkflowChain::StockAudit, stage: 1, name: "stock-counter", label: "Stock Counter" },
    StageEntry { key: WorkflowRoleKey::StockVerifier, chain: WorkflowChain::StockAudit, stage: 2, name: "stock-verifier", label: "Stock Verifier" },
    StageEntry { key: WorkflowRoleKey::StockApprover, chain: WorkflowChain::StockAudit, stage: 3, name: "stock-approver", label: "Stock Approver" },
];

impl WorkflowChain {
    pub const ALL: [WorkflowChain; 4] = [
        WorkflowChain::CashVerification,
        WorkflowChain::GoodsReceiving,
        WorkflowChain::GoodsCosting,
        WorkflowChain::StockAudit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            WorkflowChain::CashVerification => "Cash Verification",
            WorkflowChain::GoodsReceiving => "Goods Receiving",
            WorkflowChain::GoodsCosting => "Goods Costing",
            WorkflowChain::StockAudit => "Stock Audit",
        }
    }

    /// Stages in signing order.
    pub fn stages(self) -> impl Iterator<Item = WorkflowRoleKey> {
        REGISTRY
            .iter()
            .filter(move |entry| entry.chain == self)
            .map(|entry| entry.key)
    }
}

impl fmt::Display for WorkflowChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl WorkflowRoleKey {
    pub const ALL: [WorkflowRoleKey; 11] = [
        WorkflowRoleKey::CashCounter,
        WorkflowRoleKey::CashVerifier,
        WorkflowRoleKey::CashApprover,
        WorkflowRoleKey::GoodsReceiver,
        WorkflowRoleKey::GoodsVerifier,
        WorkflowRoleKey::GoodsApprover,
        WorkflowRoleKey::CostingPreparer,
        WorkflowRoleKey::CostingApprover,
        WorkflowRoleKey::StockCounter,
        WorkflowRoleKey::StockVerifier,
        WorkflowRoleKey::StockApprover,
    ];

    fn entry(&self) -> &'static StageEntry {
        &REGISTRY[*self as usize]
    }

    pub fn chain(&self) -> WorkflowChain {
        self.entry().chain
    }

    /// 1-based position within the chain.
    pub fn stage(&self) -> u8 {
        self.entry().stage
    }

    pub fn as_str(&self) -> &'static str {
        self.entry().name
    }

    pub fn label(&self) -> &'static str {
        self.entry().label
    }

    /// The other stages of this key's chain.
    pub fn chain_peers(self) -> impl Iterator<Item = WorkflowRoleKey> {
        self.chain().stages().filter(move |key| *key != self)
    }
}

impl FromStr for WorkflowRoleKey {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        REGISTRY
            .iter()
            .find(|entry| entry.name == s)
            .map(|entry| entry.key)
            .ok_or_else(|| {
                AccessError::UnknownCatalogEntry(CatalogEntry::WorkflowRole(s.to_string()))
            })
    }
}

impl fmt::Display for WorkflowRoleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
