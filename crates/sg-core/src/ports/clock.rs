pub trait ClockPort: Send + Sync {
    fn now_ms(&self) -> i64;

    /// Unix seconds, the resolution slot timestamps are stored at.
    fn now_secs(&self) -> i64 {
        self.now_ms().div_euclid(1000)
    }
}
