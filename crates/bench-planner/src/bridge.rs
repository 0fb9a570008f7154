//! Drives an external planner process over newline-delimited JSON.
//!
//! One request line goes to the child's stdin, one response line comes back
//! on its stdout. Successful responses carry `"ok": true`; failures carry
//! `"ok": false` and an `error` object with `kind` and `message`.

use crate::contract::{
    NoveltyCounters, ParseStage, PlanModel, Planner, PlannerError, PlannerFactory,
    PredicateSignature, ProblemObject,
};
use crate::variants::PlannerSettings;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct BridgeModel {
    pub id: u64,
    pub operations_taken: u64,
    pub state_facts: u64,
}

impl PlanModel for BridgeModel {
    fn operations_taken(&self) -> u64 {
        self.operations_taken
    }

    fn state_fact_count(&self) -> u64 {
        self.state_facts
    }
}

#[derive(Debug, Clone)]
pub struct BridgeFactory {
    command: Vec<String>,
}

impl BridgeFactory {
    pub fn new(command: Vec<String>) -> Result<Self, PlannerError> {
        if command.is_empty() || command[0].trim().is_empty() {
            return Err(PlannerError::Protocol(
                "planner bridge command is empty".to_string(),
            ));
        }
        Ok(Self { command })
    }

    pub fn command(&self) -> &[String] {
        &self.command
    }
}

impl PlannerFactory for BridgeFactory {
    type Planner = BridgePlanner;

    fn create(
        &self,
        domain_file: &Path,
        problem_file: &Path,
        settings: &PlannerSettings,
    ) -> Result<BridgePlanner, PlannerError> {
        let mut cmd = Command::new(&self.command[0]);
        cmd.args(&self.command[1..]);
        cmd.stdin(Stdio::piped());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::inherit());
        let mut child = cmd.spawn()?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| PlannerError::Protocol("bridge stdin unavailable".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| PlannerError::Protocol("bridge stdout unavailable".to_string()))?;
        let mut planner = BridgePlanner {
            child,
            stdin,
            stdout: BufReader::new(stdout),
            type_cache: HashMap::new(),
        };
        planner.request(json!({
            "op": "configure",
            "domain": domain_file.to_string_lossy(),
            "problem": problem_file.to_string_lossy(),
            "solver": settings.solver.as_str(),
            "search_queue": settings.search_queue.map(|q| q.as_str()),
            "heuristic": settings.heuristic.map(|h| h.as_str()),
            "model": settings.model.as_str(),
            "progress_tracker": settings.progress_tracker.as_str(),
        }))?;
        Ok(planner)
    }
}

pub struct BridgePlanner {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    type_cache: HashMap<(String, String), bool>,
}

impl BridgePlanner {
    fn request(&mut self, payload: Value) -> Result<Value, PlannerError> {
        let op = payload
            .get("op")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown")
            .to_string();
        let mut line = serde_json::to_string(&payload)?;
        line.push('\n');
        self.stdin.write_all(line.as_bytes())?;
        self.stdin.flush()?;

        let mut response = String::new();
        let read = self.stdout.read_line(&mut response)?;
        if read == 0 {
            return Err(PlannerError::Protocol(format!(
                "planner closed its output while handling '{}'",
                op
            )));
        }
        debug!(op = %op, bytes = read, "bridge response");
        decode_response(&op, &response)
    }

    fn field<T: for<'de> Deserialize<'de>>(value: &Value, key: &str) -> Result<T, PlannerError> {
        let raw = value
            .get(key)
            .cloned()
            .ok_or_else(|| PlannerError::Protocol(format!("response missing '{}'", key)))?;
        Ok(serde_json::from_value(raw)?)
    }
}

pub fn decode_response(op: &str, line: &str) -> Result<Value, PlannerError> {
    let value: Value = serde_json::from_str(line.trim())?;
    match value.get("ok").and_then(|v| v.as_bool()) {
        Some(true) => Ok(value),
        Some(false) => {
            let kind = value
                .pointer("/error/kind")
                .and_then(|v| v.as_str())
                .unwrap_or("other");
            let message = value
                .pointer("/error/message")
                .and_then(|v| v.as_str())
                .unwrap_or("no message")
                .to_string();
            Err(match (kind, op) {
                ("parse", "parse_problem") => PlannerError::Parse {
                    stage: ParseStage::Problem,
                    message,
                },
                ("parse", _) => PlannerError::Parse {
                    stage: ParseStage::Domain,
                    message,
                },
                ("search", _) => PlannerError::Search(message),
                _ => PlannerError::Other(format!("{}: {}", op, message)),
            })
        }
        None => Err(PlannerError::Protocol(format!(
            "response to '{}' has no boolean 'ok' field",
            op
        ))),
    }
}

impl Planner for BridgePlanner {
    type Model = BridgeModel;

    fn parse_domain(&mut self) -> Result<(), PlannerError> {
        self.request(json!({"op": "parse_domain"})).map(|_| ())
    }

    fn parse_problem(&mut self) -> Result<(), PlannerError> {
        self.request(json!({"op": "parse_problem"})).map(|_| ())
    }

    fn setup_search(&mut self) -> Result<(), PlannerError> {
        self.request(json!({"op": "setup"})).map(|_| ())
    }

    fn search_step(&mut self) -> Result<Option<BridgeModel>, PlannerError> {
        let response = self.request(json!({"op": "step"}))?;
        match response.get("model") {
            None | Some(Value::Null) => Ok(None),
            Some(raw) => Ok(Some(serde_json::from_value(raw.clone())?)),
        }
    }

    fn retained_models(&mut self) -> Result<Vec<BridgeModel>, PlannerError> {
        let response = self.request(json!({"op": "models"}))?;
        Self::field(&response, "models")
    }

    fn predicates(&mut self) -> Result<Vec<PredicateSignature>, PlannerError> {
        let response = self.request(json!({"op": "predicates"}))?;
        Self::field(&response, "predicates")
    }

    fn objects(&mut self) -> Result<Vec<ProblemObject>, PlannerError> {
        let response = self.request(json!({"op": "objects"}))?;
        Self::field(&response, "objects")
    }

    fn satisfies_type(
        &mut self,
        param_type: &str,
        object: &ProblemObject,
    ) -> Result<bool, PlannerError> {
        let key = (param_type.to_string(), object.name.clone());
        if let Some(hit) = self.type_cache.get(&key) {
            return Ok(*hit);
        }
        let response = self.request(json!({
            "op": "satisfies",
            "param_type": param_type,
            "object": object.name,
        }))?;
        let satisfied: bool = Self::field(&response, "satisfied")?;
        self.type_cache.insert(key, satisfied);
        Ok(satisfied)
    }

    fn novelty_counters(&mut self) -> Result<NoveltyCounters, PlannerError> {
        let response = self.request(json!({"op": "novelty"}))?;
        Ok(serde_json::from_value(response)?)
    }

    fn write_plan(&mut self, model: &BridgeModel, path: &Path) -> Result<(), PlannerError> {
        self.request(json!({
            "op": "write_plan",
            "model": model.id,
            "path": path.to_string_lossy(),
        }))
        .map(|_| ())
    }
}

impl Drop for BridgePlanner {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variants::{ModelVariant, QueueVariant, SolverVariant, TrackerVariant};

    #[test]
    fn decode_response_maps_error_kinds() {
        let ok = decode_response("setup", r#"{"ok":true}"#).expect("ok response");
        assert_eq!(ok["ok"], true);

        match decode_response(
            "parse_problem",
            r#"{"ok":false,"error":{"kind":"parse","message":"bad :init"}}"#,
        ) {
            Err(PlannerError::Parse { stage, message }) => {
                assert_eq!(stage, ParseStage::Problem);
                assert_eq!(message, "bad :init");
            }
            other => panic!("expected parse error, got {:?}", other),
        }
        match decode_response(
            "step",
            r#"{"ok":false,"error":{"kind":"search","message":"boom"}}"#,
        ) {
            Err(PlannerError::Search(message)) => assert_eq!(message, "boom"),
            other => panic!("expected search error, got {:?}", other),
        }
        assert!(matches!(
            decode_response("step", r#"{"model":null}"#),
            Err(PlannerError::Protocol(_))
        ));
        assert!(matches!(
            decode_response("step", "not json"),
            Err(PlannerError::Json(_))
        ));
    }

    #[test]
    fn novelty_counters_decode_without_cross_counts() {
        let value = decode_response(
            "novelty",
            r#"{"ok":true,"novel_states":3,"not_novel_states":1,"unique_facts":12,"novel_methods":2,"not_novel_methods":5}"#,
        )
        .expect("decode");
        let counters: NoveltyCounters = serde_json::from_value(value).expect("counters");
        assert_eq!(counters.novel_states, 3);
        assert_eq!(counters.novel_method_novel_state, None);
    }

    #[test]
    fn empty_command_is_rejected() {
        assert!(BridgeFactory::new(vec![]).is_err());
        assert!(BridgeFactory::new(vec!["  ".to_string()]).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn bridge_round_trips_with_scripted_child() {
        let script = r#"read l; echo '{"ok":true}'; read l; echo '{"ok":true,"model":null}'; read l; echo '{"ok":true,"model":{"id":4,"operations_taken":7,"state_facts":11}}'"#;
        let factory = BridgeFactory::new(vec![
            "sh".to_string(),
            "-c".to_string(),
            script.to_string(),
        ])
        .expect("factory");
        let settings = PlannerSettings {
            solver: SolverVariant::PartialOrderNovelty,
            search_queue: Some(QueueVariant::NoveltyGbfs),
            heuristic: None,
            model: ModelVariant::PandaVerify,
            progress_tracker: TrackerVariant::PandaVerifyFormat,
        };
        let mut planner = factory
            .create(Path::new("d.hddl"), Path::new("p.hddl"), &settings)
            .expect("configure");
        assert!(planner.search_step().expect("first step").is_none());
        let model = planner.search_step().expect("second step").expect("model");
        assert_eq!(model.id, 4);
        assert_eq!(model.operations_taken(), 7);
        assert_eq!(model.state_fact_count(), 11);
    }
}
