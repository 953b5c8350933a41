use nodewipe::{EraseGateway, EraseReply, NodeId, NodewipeError, Result, TaskContext};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// What a node does the n-th time it is asked to erase.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub enum Answer {
    Erased,
    NotRebooted(&'static str),
    Failed(i64),
    Silent,
}

/// In-memory gateway driven by a per-node script. A node past the end of
/// its script repeats the last answer; unscripted nodes never answer.
#[derive(Default)]
pub struct ScriptedGateway {
    scripts: HashMap<NodeId, Vec<Answer>>,
    asked: Mutex<HashMap<NodeId, usize>>,
    calls: Mutex<Vec<Vec<NodeId>>>,
    fail_on_call: Option<usize>,
    call_count: AtomicUsize,
}

#[allow(dead_code)]
impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(mut self, uid: u64, answers: Vec<Answer>) -> Self {
        self.scripts.insert(NodeId(uid), answers);
        self
    }

    /// Make the given (1-based) gateway call fail with a transport error.
    pub fn fail_on_call(mut self, call: usize) -> Self {
        self.fail_on_call = Some(call);
        self
    }

    pub fn calls(&self) -> Vec<Vec<NodeId>> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    fn answer_for(&self, uid: NodeId) -> Option<EraseReply> {
        let script = self.scripts.get(&uid)?;
        let mut asked = self.asked.lock().unwrap();
        let n = asked.entry(uid).or_insert(0);
        let answer = script.get(*n).or_else(|| script.last())?.clone();
        *n += 1;

        match answer {
            Answer::Erased => Some(EraseReply::erased(uid)),
            Answer::NotRebooted(msg) => Some(EraseReply::not_rebooted(uid, msg)),
            Answer::Failed(code) => Some(EraseReply::failed(uid, code)),
            Answer::Silent => None,
        }
    }
}

impl EraseGateway for ScriptedGateway {
    async fn erase(
        &self,
        _ctx: &TaskContext,
        uids: &[NodeId],
        reboot: bool,
    ) -> Result<Vec<EraseReply>> {
        assert!(reboot, "erase_node must always request a reboot");
        let call = self.call_count.fetch_add(1, Ordering::SeqCst) + 1;
        self.calls.lock().unwrap().push(uids.to_vec());

        if self.fail_on_call == Some(call) {
            return Err(NodewipeError::Transport(format!(
                "broker unreachable on call {}",
                call
            )));
        }

        Ok(uids.iter().filter_map(|uid| self.answer_for(*uid)).collect())
    }
}

pub fn ids(v: &[u64]) -> Vec<NodeId> {
    v.iter().copied().map(NodeId).collect()
}
