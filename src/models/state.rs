/// Which screen the terminal app is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    /// Questions are being loaded in the background.
    Loading,
    /// Questions are loaded, waiting for the user to start.
    Welcome,
    /// A quiz session is running.
    Quiz,
    /// Showing the results of the last session.
    Result,
    /// Loading failed; nothing to quiz on.
    Failed,
}
