/// Lifecycle shared by every engine subsystem.
///
/// The owner calls `startup` once, then `begin_frame`/`end_frame` around
/// every frame, then `shutdown` once. All hooks default to no-ops.
pub trait EngineSubsystem {
    /// Short name used in lifecycle logs.
    fn name(&self) -> &'static str;

    fn startup(&mut self) {}

    fn begin_frame(&mut self) {}

    fn end_frame(&mut self) {}

    fn shutdown(&mut self) {}
}
