//! Feedback channel carrying severity-colored messages to the embedding UI.

use tokio::sync::mpsc;
use tracing::warn;

use crate::models::Message;

/// Sending half of the dialog feedback channel.
///
/// Inline messages are the only feedback surface besides a full view
/// reload, so the dialog never fails because a receiver went away; a
/// closed channel is logged and the message dropped.
#[derive(Debug, Clone)]
pub struct FeedbackSender {
    sender: mpsc::Sender<Message>,
}

impl FeedbackSender {
    pub fn new(sender: mpsc::Sender<Message>) -> Self {
        Self { sender }
    }

    /// Create a connected sender/receiver pair.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Message>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self::new(tx), rx)
    }

    /// Deliver one message to the UI.
    pub async fn send(&self, message: Message) {
        if let Err(e) = self.sender.send(message).await {
            warn!("Dropping feedback message, receiver closed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Severity;

    #[tokio::test]
    async fn messages_arrive_in_order() {
        let (sender, mut rx) = FeedbackSender::channel(8);

        sender.send(Message::info("first")).await;
        sender.send(Message::danger("second")).await;

        let first = rx.recv().await.expect("first message");
        assert_eq!(first.severity, Severity::Info);
        assert_eq!(first.text, "first");

        let second = rx.recv().await.expect("second message");
        assert_eq!(second.severity, Severity::Danger);
    }

    #[tokio::test]
    async fn closed_receiver_does_not_error() {
        let (sender, rx) = FeedbackSender::channel(1);
        drop(rx);
        // Must not panic or block.
        sender.send(Message::success("ignored")).await;
    }
}
