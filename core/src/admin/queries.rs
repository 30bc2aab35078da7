// bulk_reroute/src/admin/queries.rs

//! GraphQL documents sent to the admin API.

pub const GET_BULK_OPERATION_OP: &str = "GetBulkOperation";
pub const GET_BULK_OPERATION_QUERY: &str = r#"
query GetBulkOperation($id: ID!) {
  node(id: $id) {
    ... on BulkOperation {
      id
      status
      query
      errorCode
      createdAt
      completedAt
      objectCount
      fileSize
      type
      url
      partialDataUrl
    }
  }
}
"#;

pub const FULFILLMENT_ORDERS_REROUTE_OP: &str = "fulfillmentOrdersReroute";
pub const FULFILLMENT_ORDERS_REROUTE_MUTATION: &str = r#"
mutation fulfillmentOrdersReroute($excludedLocationIds: [ID!], $fulfillmentOrderIds: [ID!]!, $includedLocationIds: [ID!]) {
  fulfillmentOrdersReroute(excludedLocationIds: $excludedLocationIds, fulfillmentOrderIds: $fulfillmentOrderIds, includedLocationIds: $includedLocationIds) {
    movedFulfillmentOrders {
      id
      status
      assignedLocation {
        location {
          id
        }
      }
    }
    userErrors {
      field
      message
    }
  }
}
"#;

pub const FLOW_TRIGGER_RECEIVE_OP: &str = "flowTriggerReceive";
pub const FLOW_TRIGGER_RECEIVE_MUTATION: &str = r#"
mutation flowTriggerReceive($handle: String, $payload: JSON) {
  flowTriggerReceive(handle: $handle, payload: $payload) {
    userErrors {
      field
      message
    }
  }
}
"#;

pub const WEBHOOK_SUBSCRIPTION_OP: &str = "webhookSubscription";
pub const WEBHOOK_SUBSCRIPTION_QUERY: &str = r#"
query webhookSubscription($id: ID!) {
  webhookSubscription(id: $id) {
    id
    topic
    endpoint {
      ... on WebhookHttpEndpoint {
        callbackUrl
      }
    }
  }
}
"#;

pub const WEBHOOK_SUBSCRIPTIONS_OP: &str = "webhookSubscriptions";
pub const WEBHOOK_SUBSCRIPTIONS_QUERY: &str = r#"
query webhookSubscriptions($first: Int!) {
  webhookSubscriptions(first: $first) {
    edges {
      node {
        id
        topic
        endpoint {
          ... on WebhookHttpEndpoint {
            callbackUrl
          }
        }
      }
    }
  }
}
"#;

pub const WEBHOOK_SUBSCRIPTION_CREATE_OP: &str = "webhookSubscriptionCreate";
pub const WEBHOOK_SUBSCRIPTION_CREATE_MUTATION: &str = r#"
mutation webhookSubscriptionCreate($topic: WebhookSubscriptionTopic!, $webhookSubscription: WebhookSubscriptionInput!) {
  webhookSubscriptionCreate(topic: $topic, webhookSubscription: $webhookSubscription) {
    webhookSubscription {
      id
      topic
      endpoint {
        ... on WebhookHttpEndpoint {
          callbackUrl
        }
      }
    }
    userErrors {
      field
      message
    }
  }
}
"#;

pub const WEBHOOK_SUBSCRIPTION_UPDATE_OP: &str = "webhookSubscriptionUpdate";
pub const WEBHOOK_SUBSCRIPTION_UPDATE_MUTATION: &str = r#"
mutation webhookSubscriptionUpdate($id: ID!, $webhookSubscription: WebhookSubscriptionInput!) {
  webhookSubscriptionUpdate(id: $id, webhookSubscription: $webhookSubscription) {
    webhookSubscription {
      id
      topic
      endpoint {
        ... on WebhookHttpEndpoint {
          callbackUrl
        }
      }
    }
    userErrors {
      field
      message
    }
  }
}
"#;
