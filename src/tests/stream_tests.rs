#[cfg(test)]
mod tests {
    use std::convert::Infallible;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use axum::extract::Path;
    use axum::http::StatusCode;
    use axum::response::sse::{Event, Sse};
    use axum::routing::{get, post};
    use axum::Router;
    use futures::{stream, StreamExt};
    use tokio::sync::mpsc;
    use tokio_util::sync::CancellationToken;
    use uuid::Uuid;

    use crate::client::stream::{spawn_reader, StreamEvent};
    use crate::client::thumbs::ThumbStore;
    use crate::client::{self, control};
    use crate::error::AppError;
    use crate::metrics::Metrics;
    use crate::types::ControlCommand;

    const RECV_TIMEOUT: Duration = Duration::from_secs(5);

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        format!("http://{}", addr)
    }

    fn test_client() -> reqwest::Client {
        client::build_client(Duration::from_millis(2000)).unwrap()
    }

    async fn recv(rx: &mut mpsc::UnboundedReceiver<StreamEvent>) -> Option<StreamEvent> {
        tokio::time::timeout(RECV_TIMEOUT, rx.recv()).await.expect("stream event timed out")
    }

    /// Serves the given data frames once, then ends the stream.
    fn sse_app(frames: Vec<String>) -> Router {
        Router::new().route(
            "/progress_stream/{job_id}",
            get(move |Path(_job): Path<Uuid>| {
                let frames = frames.clone();
                async move {
                    let events = frames
                        .into_iter()
                        .map(|data| Ok::<Event, Infallible>(Event::default().data(data)));
                    Sse::new(stream::iter(events))
                }
            }),
        )
    }

    /// Serves keepalive frames forever.
    fn endless_sse_app() -> Router {
        Router::new().route(
            "/progress_stream/{job_id}",
            get(|Path(_job): Path<Uuid>| async {
                let ticks =
                    tokio_stream::wrappers::IntervalStream::new(tokio::time::interval(
                        Duration::from_millis(20),
                    ));
                let events =
                    ticks.map(|_| Ok::<Event, Infallible>(Event::default().data("keepalive")));
                Sse::new(events)
            }),
        )
    }

    #[tokio::test]
    async fn test_reader_decodes_frames_and_drops_bad_ones() {
        let frames = vec![
            "keepalive".to_string(),
            "{definitely not json".to_string(),
            r#"{"stage":"Hashing","progress":1,"total":2}"#.to_string(),
            r#"{"done":true}"#.to_string(),
        ];
        let base = serve(sse_app(frames)).await;
        let metrics = Metrics::new();
        let cancel = CancellationToken::new();
        let (handle, mut rx) =
            spawn_reader(test_client(), &base, Uuid::new_v4(), cancel, metrics.clone());

        assert!(matches!(recv(&mut rx).await, Some(StreamEvent::Opened)));

        // The keepalive and the undecodable frame never reach the loop
        let snap = match recv(&mut rx).await {
            Some(StreamEvent::Snapshot(snap)) => snap,
            other => panic!("expected first snapshot, got {:?}", other),
        };
        assert_eq!(snap.stage.as_deref(), Some("Hashing"));
        assert_eq!(snap.progress, Some(1));

        let terminal = match recv(&mut rx).await {
            Some(StreamEvent::Snapshot(snap)) => snap,
            other => panic!("expected terminal snapshot, got {:?}", other),
        };
        assert!(terminal.is_terminal());

        assert!(matches!(recv(&mut rx).await, Some(StreamEvent::Ended)));
        assert_eq!(metrics.snapshots_dropped.load(Ordering::Relaxed), 1);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_cancel_tears_the_reader_down() {
        let base = serve(endless_sse_app()).await;
        let cancel = CancellationToken::new();
        let (handle, mut rx) =
            spawn_reader(test_client(), &base, Uuid::new_v4(), cancel.clone(), Metrics::new());

        assert!(matches!(recv(&mut rx).await, Some(StreamEvent::Opened)));
        cancel.cancel();
        handle.await.unwrap();

        // Keepalives never surface; after teardown the channel drains to None
        while let Some(event) = rx.recv().await {
            assert!(!matches!(event, StreamEvent::Snapshot(_)));
        }
    }

    #[tokio::test]
    async fn test_reader_reports_connect_failure_as_transport_error() {
        // Nothing listens on this port
        let cancel = CancellationToken::new();
        let (handle, mut rx) = spawn_reader(
            test_client(),
            "http://127.0.0.1:9",
            Uuid::new_v4(),
            cancel,
            Metrics::new(),
        );

        match recv(&mut rx).await {
            Some(StreamEvent::TransportError(_)) => {}
            other => panic!("expected transport error, got {:?}", other),
        }
        handle.await.unwrap();
    }

    #[derive(Clone, Default)]
    struct ControlLog(Arc<tokio::sync::Mutex<Vec<String>>>);

    fn control_app(log: ControlLog, reject_all: bool) -> Router {
        Router::new().route(
            "/control/{job_id}/{command}",
            post(move |Path((_job, command)): Path<(Uuid, String)>| {
                let log = log.clone();
                async move {
                    log.0.lock().await.push(command);
                    if reject_all {
                        StatusCode::CONFLICT
                    } else {
                        StatusCode::OK
                    }
                }
            }),
        )
    }

    #[tokio::test]
    async fn test_control_send_posts_the_command() {
        let log = ControlLog::default();
        let base = serve(control_app(log.clone(), false)).await;
        let job_id = Uuid::new_v4();

        control::send(&test_client(), &base, job_id, ControlCommand::Pause).await.unwrap();
        control::send(&test_client(), &base, job_id, ControlCommand::Resume).await.unwrap();

        assert_eq!(*log.0.lock().await, vec!["pause".to_string(), "resume".to_string()]);
    }

    #[tokio::test]
    async fn test_control_send_surfaces_rejection() {
        let log = ControlLog::default();
        let base = serve(control_app(log, true)).await;

        let err = control::send(&test_client(), &base, Uuid::new_v4(), ControlCommand::Stop)
            .await
            .unwrap_err();
        match err {
            AppError::ControlRejected { command, status } => {
                assert_eq!(command, "stop");
                assert_eq!(status, 409);
            }
            other => panic!("expected rejection, got {}", other),
        }
    }

    #[tokio::test]
    async fn test_control_dispatch_feeds_failures_back() {
        let log = ControlLog::default();
        let base = serve(control_app(log, true)).await;
        let metrics = Metrics::new();
        let (feedback_tx, mut feedback_rx) = mpsc::unbounded_channel();

        control::dispatch(
            test_client(),
            base,
            Uuid::new_v4(),
            ControlCommand::Stop,
            metrics.clone(),
            feedback_tx,
        );

        let notice = tokio::time::timeout(RECV_TIMEOUT, feedback_rx.recv())
            .await
            .expect("feedback timed out")
            .unwrap();
        assert!(notice.contains("stop"));
        assert_eq!(metrics.controls_sent.load(Ordering::Relaxed), 0);
    }

    fn thumb_app(hits: Arc<AtomicUsize>) -> Router {
        Router::new().route(
            "/thumb/{fname}",
            get(move |Path(fname): Path<String>| {
                let hits = hits.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    if fname == "missing.jpg" {
                        (StatusCode::NOT_FOUND, Vec::new())
                    } else {
                        (StatusCode::OK, vec![0u8; 64])
                    }
                }
            }),
        )
    }

    #[tokio::test]
    async fn test_thumbnails_are_fetched_once_per_identifier() {
        let hits = Arc::new(AtomicUsize::new(0));
        let base = serve(thumb_app(hits.clone())).await;
        let metrics = Metrics::new();
        let mut store = ThumbStore::new(test_client(), base, 8, metrics.clone());

        assert_eq!(store.fetch("3f9c2a1b.jpg").await, Some(64));
        assert_eq!(store.fetch("3f9c2a1b.jpg").await, Some(64));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(metrics.thumbnails_fetched.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_missing_thumbnail_is_swallowed() {
        let hits = Arc::new(AtomicUsize::new(0));
        let base = serve(thumb_app(hits)).await;
        let mut store = ThumbStore::new(test_client(), base, 8, Metrics::new());

        assert_eq!(store.fetch("missing.jpg").await, None);
        assert!(store.is_empty());
    }
}
