use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Unique identifier of a removable node.
///
/// Orchestrators hand node uids around both as JSON numbers and as numeric
/// strings, so deserialization accepts either form. Serialization always
/// emits a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl NodeId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl From<u64> for NodeId {
    fn from(v: u64) -> Self {
        NodeId(v)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawUid {
            Number(u64),
            Text(String),
        }

        match RawUid::deserialize(deserializer)? {
            RawUid::Number(n) => Ok(NodeId(n)),
            RawUid::Text(s) => s.trim().parse::<u64>().map(NodeId).map_err(|_| {
                serde::de::Error::custom(format!("node uid must be numeric, got {:?}", s))
            }),
        }
    }
}

/// One node's outcome inside a collection. `error` is only set for nodes
/// that ended up in the error or inaccessible sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub uid: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl NodeRecord {
    pub fn new(uid: impl Into<NodeId>) -> Self {
        NodeRecord {
            uid: uid.into(),
            error: None,
        }
    }

    pub fn with_error(uid: impl Into<NodeId>, error: impl Into<String>) -> Self {
        NodeRecord {
            uid: uid.into(),
            error: Some(error.into()),
        }
    }
}

/// Correlation data carried through one removal call. Only used for logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskContext {
    pub task_id: String,
}

impl TaskContext {
    pub fn new(task_id: impl Into<String>) -> Self {
        TaskContext {
            task_id: task_id.into(),
        }
    }
}

/// Payload of an `erase_node` reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EraseData {
    #[serde(default)]
    pub rebooted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_msg: Option<String>,
}

/// Per-node result record returned by a removal gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EraseReply {
    pub sender: NodeId,
    pub statuscode: i64,
    #[serde(default)]
    pub data: EraseData,
}

impl EraseReply {
    pub const STATUS_OK: i64 = 0;

    pub fn erased(sender: impl Into<NodeId>) -> Self {
        EraseReply {
            sender: sender.into(),
            statuscode: Self::STATUS_OK,
            data: EraseData {
                rebooted: true,
                error_msg: None,
            },
        }
    }

    pub fn not_rebooted(sender: impl Into<NodeId>, error_msg: impl Into<String>) -> Self {
        EraseReply {
            sender: sender.into(),
            statuscode: Self::STATUS_OK,
            data: EraseData {
                rebooted: false,
                error_msg: Some(error_msg.into()),
            },
        }
    }

    pub fn failed(sender: impl Into<NodeId>, statuscode: i64) -> Self {
        EraseReply {
            sender: sender.into(),
            statuscode,
            data: EraseData::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemovalStatus {
    Error,
}

/// Consolidated outcome of one removal call.
///
/// `status` flips to error only when the error set is non-empty after all
/// retries. Nodes that never answered are reported in `inaccessible_nodes`
/// without touching `status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RemovalResult {
    pub nodes: Vec<NodeRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inaccessible_nodes: Option<Vec<NodeRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RemovalStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_nodes: Option<Vec<NodeRecord>>,
}

impl RemovalResult {
    pub fn is_error(&self) -> bool {
        self.status == Some(RemovalStatus::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_node_id_accepts_number_and_string() {
        let a: NodeId = serde_json::from_value(json!(7)).unwrap();
        let b: NodeId = serde_json::from_value(json!("7")).unwrap();
        assert_eq!(a, b);
        assert_eq!(serde_json::to_value(a).unwrap(), json!(7));
    }

    #[test]
    fn test_node_id_rejects_non_numeric() {
        let err = serde_json::from_value::<NodeId>(json!("node-7")).unwrap_err();
        assert!(err.to_string().contains("numeric"));
    }

    #[test]
    fn test_node_record_ignores_extra_fields() {
        let rec: NodeRecord = serde_json::from_value(json!({
            "uid": "3",
            "roles": ["compute"],
            "mac": "52:54:00:aa:bb:cc"
        }))
        .unwrap();
        assert_eq!(rec, NodeRecord::new(3));
        assert_eq!(serde_json::to_value(&rec).unwrap(), json!({"uid": 3}));
    }

    #[test]
    fn test_erase_reply_defaults_missing_data() {
        let reply: EraseReply =
            serde_json::from_value(json!({"sender": 4, "statuscode": 1})).unwrap();
        assert!(!reply.data.rebooted);
        assert_eq!(reply.data.error_msg, None);
    }

    #[test]
    fn test_removal_result_skips_empty_optionals() {
        let result = RemovalResult {
            nodes: vec![NodeRecord::new(1)],
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"nodes": [{"uid": 1}]})
        );
        assert!(!result.is_error());
    }

    #[test]
    fn test_removal_status_serializes_lowercase() {
        let result = RemovalResult {
            nodes: vec![],
            inaccessible_nodes: None,
            status: Some(RemovalStatus::Error),
            error_nodes: Some(vec![NodeRecord::with_error(2, "boom")]),
        };
        let v = serde_json::to_value(&result).unwrap();
        assert_eq!(v["status"], "error");
        assert_eq!(v["error_nodes"][0]["error"], "boom");
        assert!(result.is_error());
    }
}
