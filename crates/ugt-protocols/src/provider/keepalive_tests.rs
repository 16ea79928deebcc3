use super::*;
use crate::error::ProviderError;
use tokio::time::Instant;

fn fragments(items: Vec<&'static str>) -> FragmentStream {
    Box::pin(futures::stream::iter(
        items
            .into_iter()
            .map(|s| Ok::<_, ProviderError>(StreamSignal::fragment(s))),
    ))
}

#[tokio::test(start_paused = true)]
async fn test_passthrough_when_busy() {
    let mut stream = with_keepalive(fragments(vec!["a", "b"]), DEFAULT_KEEPALIVE);
    assert_eq!(stream.next().await.unwrap().unwrap(), StreamSignal::fragment("a"));
    assert_eq!(stream.next().await.unwrap().unwrap(), StreamSignal::fragment("b"));
    assert!(stream.next().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_keepalive_while_silent() {
    let inner: FragmentStream = Box::pin(futures::stream::pending());
    let mut stream = with_keepalive(inner, Duration::from_secs(15));

    let start = Instant::now();
    assert_eq!(stream.next().await.unwrap().unwrap(), StreamSignal::KeepAlive);
    assert!(start.elapsed() >= Duration::from_secs(15));

    assert_eq!(stream.next().await.unwrap().unwrap(), StreamSignal::KeepAlive);
    assert!(start.elapsed() >= Duration::from_secs(30));
}

#[tokio::test(start_paused = true)]
async fn test_late_fragment_after_keepalive() {
    let inner: FragmentStream = Box::pin(async_stream::stream! {
        tokio::time::sleep(Duration::from_secs(20)).await;
        yield Ok::<_, ProviderError>(StreamSignal::fragment("late"));
    });
    let mut stream = with_keepalive(inner, Duration::from_secs(15));

    assert_eq!(stream.next().await.unwrap().unwrap(), StreamSignal::KeepAlive);
    assert_eq!(
        stream.next().await.unwrap().unwrap(),
        StreamSignal::fragment("late")
    );
    assert!(stream.next().await.is_none());
}
