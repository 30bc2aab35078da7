// bulk_reroute/src/lib.rs

//! bulk_reroute: relays "bulk operation finished" webhooks into fulfillment
//! order reroutes.
//!
//! One invocation resolves the finished bulk operation through the admin
//! GraphQL API, checks that it belongs to the order-release query family and
//! has completed, downloads and parses its JSONL result file, picks out the
//! `FulfillmentOrder` rows and submits them for rerouting.
//!
//! The flow is a [`Pipeline`] of named steps over a per-invocation
//! [`ContextData`]; gates stop the pipeline early with an explanatory message
//! instead of failing it.

pub mod admin;
pub mod error;
pub mod extract;
pub mod jsonl;
pub mod outcome;
pub mod pipeline;
pub mod resolver;
pub mod settings;
pub mod submit;
pub mod subscription;
pub mod webhook;

pub use crate::admin::{AdminClient, AdminCredentials, AdminGraphql, GraphqlRequest, HttpResultFiles, ResultFileSource};
pub use crate::error::{RelayError, RelayResult};
pub use crate::extract::{extract_work_items, ExtractRule, ReferencePattern, WorkItem};
pub use crate::jsonl::{parse_jsonl, ParsedRecord};
pub use crate::outcome::{OutcomeStatus, ProcessingOutcome};
pub use crate::pipeline::{ContextData, Pipeline, PipelineControl, PipelineResult};
pub use crate::resolver::resolve_bulk_operation;
pub use crate::settings::{parse_id_list, RelaySettings};
pub use crate::submit::{submit_work_items, ItemError, LocationFilter, RerouteStrategy, SubmissionReport};
pub use crate::subscription::{ensure_webhook_subscription, InMemorySubscriptionStore, SubscriptionIdStore};
pub use crate::webhook::{BulkOperationNotification, BulkOperationWebhook};
