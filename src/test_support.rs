// Shared test helpers: local stub servers and a counting fake strategy

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;

use crate::resolver::{ResolveStrategy, StrategyFault, StreamFormat, VideoDetails, VideoId};

/// Serve `app` on an ephemeral local port, returns `http://127.0.0.1:<port>`
pub async fn spawn_stub(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

#[derive(Debug, Clone, Copy)]
pub enum Behaviour {
    Data,
    Empty,
    Fault,
    Hang,
}

/// Fake strategy that counts its invocations
pub struct CountingStrategy {
    name: &'static str,
    behaviour: Behaviour,
    calls: Arc<AtomicUsize>,
}

impl CountingStrategy {
    pub fn new(name: &'static str, behaviour: Behaviour) -> (Box<Self>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let strategy = Box::new(Self {
            name,
            behaviour,
            calls: calls.clone(),
        });
        (strategy, calls)
    }
}

#[async_trait]
impl ResolveStrategy for CountingStrategy {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn resolve(&self, _video_id: &VideoId) -> Result<Option<VideoDetails>, StrategyFault> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.behaviour {
            Behaviour::Data => Ok(Some(VideoDetails {
                title: format!("from {}", self.name),
                author: "author".to_string(),
                duration_seconds: Some(125),
                thumbnail: None,
                formats: vec![StreamFormat {
                    quality: "360p".to_string(),
                    mime_type: "video/mp4".to_string(),
                    url: "https://example.com/v.mp4".to_string(),
                }],
            })),
            Behaviour::Empty => Ok(None),
            Behaviour::Fault => Err(StrategyFault::Network("connection reset".to_string())),
            Behaviour::Hang => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(None)
            }
        }
    }
}
