use super::*;
use async_trait::async_trait;

/// Echoes the message and the number of turns it was shown; fails on "boom".
struct EchoModel {
    seen: Mutex<Vec<Vec<ChatTurn>>>,
}

impl EchoModel {
    fn new() -> Arc<Self> { Arc::new(Self { seen: Mutex::new(Vec::new()) }) }
}

#[async_trait]
impl ChatModel for EchoModel {
    fn name(&self) -> &str { "echo" }

    async fn reply(&self, _system_prompt: &str, turns: &[ChatTurn]) -> Result<String, ChatError> {
        self.seen.lock().push(turns.to_vec());
        let last = turns.last().map(|t| t.text.clone()).unwrap_or_default();
        if last == "boom" {
            return Err(ChatError::EmptyReply);
        }
        Ok(format!("{} ({} turns)", last, turns.len()))
    }
}

#[tokio::test]
async fn history_grows_per_session() {
    let model = EchoModel::new();
    let relay = ChatRelay::new(model.clone(), "sys", 40);
    assert_eq!(relay.send("a", "hi").await.unwrap(), "hi (1 turns)");
    assert_eq!(relay.send("a", "again").await.unwrap(), "again (3 turns)");
    assert_eq!(relay.send("b", "other").await.unwrap(), "other (1 turns)");
    assert_eq!(relay.session_count(), 2);
    assert_eq!(relay.history_len("a").await, 4);
    let seen = model.seen.lock();
    assert_eq!(seen[1][0], ChatTurn::user("hi"));
    assert_eq!(seen[1][1].speaker, Speaker::Model);
}

#[tokio::test]
async fn failed_turn_leaves_history_untouched() {
    let relay = ChatRelay::new(EchoModel::new(), "sys", 40);
    relay.send("s", "hello").await.unwrap();
    assert!(relay.send("s", "boom").await.is_err());
    assert_eq!(relay.history_len("s").await, 2);
    assert_eq!(relay.send("s", "next").await.unwrap(), "next (3 turns)");
}

#[tokio::test]
async fn history_is_capped_from_the_front() {
    let relay = ChatRelay::new(EchoModel::new(), "sys", 4);
    for i in 0..5 {
        relay.send("s", &format!("m{i}")).await.unwrap();
    }
    assert_eq!(relay.history_len("s").await, 4);
}

#[test]
fn cap_never_starts_with_model_turn() {
    let mut turns = vec![ChatTurn::user("a"), ChatTurn::model("b"), ChatTurn::user("c"), ChatTurn::model("d")];
    cap_history(&mut turns, 3);
    assert_eq!(turns, vec![ChatTurn::user("c"), ChatTurn::model("d")]);
}

#[tokio::test]
async fn reset_drops_the_session() {
    let relay = ChatRelay::new(EchoModel::new(), "sys", 40);
    relay.send("s", "hello").await.unwrap();
    assert!(relay.reset("s"));
    assert!(!relay.reset("s"));
    assert_eq!(relay.send("s", "fresh").await.unwrap(), "fresh (1 turns)");
}

#[tokio::test]
async fn idle_sessions_are_swept() {
    let relay = ChatRelay::new(EchoModel::new(), "sys", 40);
    relay.send("old", "hi").await.unwrap();
    let later = Instant::now() + Duration::from_secs(7200);
    assert_eq!(relay.sweep_idle_at(Instant::now(), Duration::from_secs(3600)), 0);
    assert_eq!(relay.sweep_idle_at(later, Duration::from_secs(3600)), 1);
    assert_eq!(relay.session_count(), 0);
}

#[tokio::test]
async fn looking_up_a_slot_keeps_it_from_the_sweeper() {
    let relay = ChatRelay::new(EchoModel::new(), "sys", 40);
    relay.send("s", "hi").await.unwrap();
    std::thread::sleep(Duration::from_millis(40));
    let slot = relay.slot("s");
    assert_eq!(relay.sweep_idle_at(Instant::now(), Duration::from_millis(20)), 0);
    assert_eq!(slot.turns.lock().await.len(), 2);
    assert_eq!(relay.session_count(), 1);
}

/// Holds every reply until released.
struct GatedModel {
    gate: tokio::sync::Notify,
}

#[async_trait]
impl ChatModel for GatedModel {
    fn name(&self) -> &str { "gated" }

    async fn reply(&self, _system_prompt: &str, _turns: &[ChatTurn]) -> Result<String, ChatError> {
        self.gate.notified().await;
        Ok("done".to_string())
    }
}

#[tokio::test]
async fn history_len_waits_for_turn_in_flight() {
    let model = Arc::new(GatedModel { gate: tokio::sync::Notify::new() });
    let relay = Arc::new(ChatRelay::new(model.clone(), "sys", 40));
    let sender = {
        let relay = relay.clone();
        tokio::spawn(async move { relay.send("s", "hi").await })
    };
    while relay.session_count() == 0 {
        tokio::task::yield_now().await;
    }
    let len = {
        let relay = relay.clone();
        tokio::spawn(async move { relay.history_len("s").await })
    };
    tokio::task::yield_now().await;
    model.gate.notify_one();
    assert_eq!(sender.await.unwrap().unwrap(), "done");
    assert_eq!(len.await.unwrap(), 2);
    assert_eq!(relay.history_len("missing").await, 0);
}
