/// Log through tracing only when the scope's configured level allows it.
#[macro_export]
macro_rules! scoped_log {
    ($level:ident, $scope:expr, $($arg:tt)*) => {
        if $crate::logging::is_enabled($scope, $crate::logging::Level::$level) {
            $crate::scoped_log!(@emit $level, $scope, $($arg)*);
        }
    };
    (@emit ERROR, $scope:expr, $($arg:tt)*) => { $crate::logging::error!(scope = $scope, $($arg)*) };
    (@emit WARN, $scope:expr, $($arg:tt)*) => { $crate::logging::warn!(scope = $scope, $($arg)*) };
    (@emit INFO, $scope:expr, $($arg:tt)*) => { $crate::logging::info!(scope = $scope, $($arg)*) };
    (@emit DEBUG, $scope:expr, $($arg:tt)*) => { $crate::logging::debug!(scope = $scope, $($arg)*) };
    (@emit TRACE, $scope:expr, $($arg:tt)*) => { $crate::logging::trace!(scope = $scope, $($arg)*) };
}

/// Mode transitions and per-mode decisions.
#[macro_export]
macro_rules! locomotion_log {
    ($level:ident, $($arg:tt)*) => {
        $crate::scoped_log!($level, $crate::logging::SCOPE_LOCOMOTION, $($arg)*)
    };
}

#[macro_export]
macro_rules! trajectory_log {
    ($level:ident, $($arg:tt)*) => {
        $crate::scoped_log!($level, $crate::logging::SCOPE_TRAJECTORY, $($arg)*)
    };
}

#[macro_export]
macro_rules! mesh_log {
    ($level:ident, $($arg:tt)*) => {
        $crate::scoped_log!($level, $crate::logging::SCOPE_MESH, $($arg)*)
    };
}

#[macro_export]
macro_rules! input_log {
    ($level:ident, $($arg:tt)*) => {
        $crate::scoped_log!($level, $crate::logging::SCOPE_INPUT, $($arg)*)
    };
}

#[macro_export]
macro_rules! physics_log {
    ($level:ident, $($arg:tt)*) => {
        $crate::scoped_log!($level, $crate::logging::SCOPE_PHYSICS, $($arg)*)
    };
}
