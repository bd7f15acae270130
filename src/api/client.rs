use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use anyhow::{anyhow, Context, Result};
use fxhash::FxHashSet;
use serde_json::Value;
use crate::api::from_payload;
use crate::api::session::EditSession;
use crate::config::Config;
use crate::engine::record::{PlateAppearanceKey, PlateAppearanceRecord};

// the client is shared between threads behind an Arc, so a second request for a key
// can arrive while the first is still on the wire
#[derive(Default, Debug)]
pub struct InFlight {
    keys: Mutex<FxHashSet<PlateAppearanceKey>>,
}

impl InFlight {
    pub fn begin(&self, key: PlateAppearanceKey) -> bool {
        self.keys.lock().unwrap_or_else(PoisonError::into_inner).insert(key)
    }

    pub fn finish(&self, key: PlateAppearanceKey) {
        self.keys.lock().unwrap_or_else(PoisonError::into_inner).remove(&key);
    }

    pub fn contains(&self, key: PlateAppearanceKey) -> bool {
        self.keys.lock().unwrap_or_else(PoisonError::into_inner).contains(&key)
    }
}

pub struct ApiClient {
    agent: ureq::Agent,
    api_url: String,
    retry_sleep: Duration,
    get_attempts: u32,
    in_flight: InFlight,
}

impl ApiClient {
    pub fn new(config: &Config) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(config.timeout).build(),
            api_url: config.api_url.clone(),
            retry_sleep: config.retry_sleep,
            get_attempts: config.get_attempts.max(1),
            in_flight: InFlight::default(),
        }
    }

    pub fn url(&self, key: PlateAppearanceKey) -> String {
        let PlateAppearanceKey { game_id, inning, top, batter_seq } = key;
        format!("{}/plate_appearances/{game_id}/{inning}/{half}/{batter_seq}", self.api_url, half = if top { "top" } else { "bot" })
    }

    /// `None` when the slot has never been scored. Reads are retried on
    /// transport errors since they have no side effects.
    pub fn load(&self, key: PlateAppearanceKey) -> Result<Option<PlateAppearanceRecord>> {
        let url = self.url(key);
        let mut attempt = 1;
        loop {
            return match self.agent.get(&url).call() {
                Ok(response) => {
                    let value = response.into_json::<Value>().context("Plate appearance response was not valid json")?;
                    from_payload(&value).map(Some)
                }
                Err(ureq::Error::Status(404, _)) => Ok(None),
                Err(ureq::Error::Status(code, _)) => Err(anyhow!("Loading {key} failed with status {code}")),
                Err(ureq::Error::Transport(e)) if attempt < self.get_attempts => {
                    tracing::debug!(%key, attempt, "load failed, retrying: {e}");
                    attempt += 1;
                    std::thread::sleep(self.retry_sleep);
                    continue;
                }
                Err(e) => Err(e).with_context(|| format!("Could not load {key}")),
            };
        }
    }

    /// Posts the session's record once. Never retried: on failure the
    /// session reopens and it is up to the scorer to save again.
    pub fn save(&self, session: &mut EditSession) -> Result<()> {
        let key = session.record().key();
        if !self.in_flight.begin(key) {
            return Err(anyhow!("A save for {key} is already in flight"));
        }
        let result = match session.begin_save() {
            Ok(payload) => self.post(&payload).with_context(|| format!("Could not save {key}")),
            Err(e) => Err(e),
        };
        self.in_flight.finish(key);
        session.finish_save(&result);
        if result.is_ok() {
            tracing::info!(%key, "plate appearance saved");
        }
        result
    }

    pub fn delete(&self, key: PlateAppearanceKey) -> Result<()> {
        if !self.in_flight.begin(key) {
            return Err(anyhow!("A request for {key} is already in flight"));
        }
        let result = match self.agent.delete(&self.url(key)).call() {
            Ok(_) | Err(ureq::Error::Status(404, _)) => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Could not delete {key}")),
        };
        self.in_flight.finish(key);
        if result.is_ok() {
            tracing::info!(%key, "plate appearance deleted");
        }
        result
    }

    fn post(&self, payload: &Value) -> Result<()> {
        match self.agent.post(&format!("{}/plate_appearances", self.api_url)).send_json(payload) {
            Ok(_) => Ok(()),
            Err(ureq::Error::Status(code, response)) => {
                let body = response.into_string().unwrap_or_default();
                Err(anyhow!("Server rejected the plate appearance with status {code}: {body}"))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(batter_seq: u32) -> PlateAppearanceKey {
        PlateAppearanceKey { game_id: 40, inning: 7, top: false, batter_seq }
    }

    #[test]
    fn in_flight_marks_one_request_per_key() {
        let in_flight = InFlight::default();
        assert!(in_flight.begin(key(1)));
        assert!(!in_flight.begin(key(1)));
        assert!(in_flight.begin(key(2)));
        in_flight.finish(key(1));
        assert!(!in_flight.contains(key(1)));
        assert!(in_flight.contains(key(2)));
        assert!(in_flight.begin(key(1)));
    }

    #[test]
    fn urls() {
        let client = ApiClient::new(&Config { api_url: "http://scores.test/api".to_owned(), ..Config::default() });
        assert_eq!(client.url(key(3)), "http://scores.test/api/plate_appearances/40/7/bot/3");
    }

    #[test]
    fn invalid_record_is_not_sent() {
        let client = ApiClient::new(&Config { api_url: "http://127.0.0.1:9".to_owned(), ..Config::default() });
        let mut session = EditSession::open(PlateAppearanceRecord::new(key(5)));
        assert!(client.save(&mut session).is_err());
        assert!(!client.in_flight.contains(key(5)));
        assert_eq!(session.state(), crate::api::session::SessionState::Open);
    }

    #[test]
    fn concurrent_begins_let_one_through() {
        let in_flight = InFlight::default();
        let won = std::thread::scope(|scope| {
            let handles = (0..4).map(|_| scope.spawn(|| in_flight.begin(key(6)))).collect::<Vec<_>>();
            handles.into_iter().map(|handle| handle.join().unwrap()).filter(|&won| won).count()
        });
        assert_eq!(won, 1);
    }

    #[test]
    fn outstanding_request_refuses_save_and_delete() {
        let client = ApiClient::new(&Config { api_url: "http://127.0.0.1:9".to_owned(), ..Config::default() });
        let mut record = PlateAppearanceRecord::new(key(7));
        record.apply(crate::ScorerAction::SetPlayer(3));
        let mut session = EditSession::open(record);
        assert!(client.in_flight.begin(key(7)));
        assert!(client.save(&mut session).is_err());
        assert!(client.delete(key(7)).is_err());
        assert_eq!(session.state(), crate::api::session::SessionState::Open);
        assert!(client.in_flight.contains(key(7)));
    }
}
