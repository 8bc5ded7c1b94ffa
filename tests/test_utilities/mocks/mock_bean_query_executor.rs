use async_trait::async_trait;
use jmx_collector::prelude::*;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Clone)]
enum Outcome {
    Reply(String),
    Fail(i32, String),
    Unreachable,
    Stall(Duration),
}

/// Mock BeanQueryExecutor answering per target, recording every query
#[derive(Clone)]
pub struct MockBeanQueryExecutor {
    default_reply: String,
    outcomes: HashMap<String, Outcome>,
    pub queries: Arc<Mutex<Vec<BeanQuery>>>,
}

impl MockBeanQueryExecutor {
    pub fn new(default_reply: &str) -> Self {
        Self {
            default_reply: default_reply.to_string(),
            outcomes: HashMap::new(),
            queries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_reply(mut self, target: &str, reply: &str) -> Self {
        self.outcomes
            .insert(target.to_string(), Outcome::Reply(reply.to_string()));
        self
    }

    /// Helper answers with a non-zero exit code
    pub fn with_exit_code(mut self, target: &str, exit_code: i32, message: &str) -> Self {
        self.outcomes.insert(
            target.to_string(),
            Outcome::Fail(exit_code, message.to_string()),
        );
        self
    }

    pub fn with_unreachable(mut self, target: &str) -> Self {
        self.outcomes.insert(target.to_string(), Outcome::Unreachable);
        self
    }

    pub fn with_stall(mut self, target: &str, delay: Duration) -> Self {
        self.outcomes.insert(target.to_string(), Outcome::Stall(delay));
        self
    }

    pub fn queried_targets(&self) -> Vec<String> {
        let mut targets: Vec<String> = self
            .queries
            .lock()
            .unwrap()
            .iter()
            .map(|q| q.target.clone())
            .collect();
        targets.sort();
        targets
    }
}

#[async_trait]
impl BeanQueryExecutor for MockBeanQueryExecutor {
    async fn run_bean_query(&self, query: &BeanQuery) -> std::result::Result<String, CollectorError> {
        self.queries.lock().unwrap().push(query.clone());
        match self.outcomes.get(&query.target).cloned() {
            None => Ok(self.default_reply.clone()),
            Some(Outcome::Reply(reply)) => Ok(reply),
            Some(Outcome::Fail(exit_code, message)) => {
                Err(CollectorError::Protocol { exit_code, message })
            }
            Some(Outcome::Unreachable) => Err(CollectorError::Transport {
                address: "local:/tmp/mock.socket".to_string(),
                details: "Connection refused (os error 111)".to_string(),
            }),
            Some(Outcome::Stall(delay)) => {
                tokio::time::sleep(delay).await;
                Ok(self.default_reply.clone())
            }
        }
    }

    async fn stats(&self) -> std::result::Result<String, CollectorError> {
        Ok("NGServer 1.0.0 started on local:/tmp/mock.socket".to_string())
    }
}
