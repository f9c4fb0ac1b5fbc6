#![macro_use]

/// Time a block and report the elapsed duration through tracing.
#[macro_export]
macro_rules! profile {
    ($description:expr, $block:expr) => {{
        let start = std::time::Instant::now();
        let result = $block;
        let duration = start.elapsed();
        $crate::logging::debug!(elapsed = ?duration, "[{}]", $description);
        result
    }};
}
