//! Defines the JSON protocol spoken with the remote document store.
//!
//! Every request is a `{ command, params }` envelope; every reply is tagged
//! with `status: success | error`. Documents are open JSON records keyed by
//! a string id inside a named collection.

use serde::{Deserialize, Serialize, de::DeserializeOwned};

pub trait StoreCommand: Serialize {
    type Response: DeserializeOwned;
    fn command() -> Command;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    ListDocuments,
    GetDocument,
    PutDocument,
    DeleteDocument,
}

/// Request sent to the store.
#[derive(Debug, Serialize, Deserialize)]
pub struct Request {
    pub command: Command,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Response sent back by the store.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response<T> {
    Success { data: T },
    Error { error: String },
}

/// A stored document: the id plus the record's fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub fields: serde_json::Value,
}

/// List a whole collection, in store order.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListDocuments {
    pub collection: String,
}

impl StoreCommand for ListDocuments {
    type Response = Vec<Document>;
    fn command() -> Command {
        Command::ListDocuments
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GetDocument {
    pub collection: String,
    pub id: String,
}

impl StoreCommand for GetDocument {
    type Response = Option<Document>;
    fn command() -> Command {
        Command::GetDocument
    }
}

/// Create or fully replace a document.
#[derive(Debug, Serialize, Deserialize)]
pub struct PutDocument {
    pub collection: String,
    pub document: Document,
}

impl StoreCommand for PutDocument {
    type Response = ();
    fn command() -> Command {
        Command::PutDocument
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteDocument {
    pub collection: String,
    pub id: String,
}

impl StoreCommand for DeleteDocument {
    type Response = ();
    fn command() -> Command {
        Command::DeleteDocument
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_envelope_is_tagged_by_status() {
        let ok: Response<Vec<Document>> =
            serde_json::from_str(r#"{"status":"success","data":[]}"#).unwrap();
        assert!(matches!(ok, Response::Success { data } if data.is_empty()));

        let err: Response<()> =
            serde_json::from_str(r#"{"status":"error","error":"permission denied"}"#).unwrap();
        assert!(matches!(err, Response::Error { error } if error == "permission denied"));
    }

    #[test]
    fn test_request_serializes_snake_case_command() {
        let request = Request {
            command: DeleteDocument::command(),
            params: serde_json::json!({"collection": "events", "id": "e1"}),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["command"], "delete_document");
        assert_eq!(json["params"]["id"], "e1");
    }
}
