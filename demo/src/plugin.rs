/// Lifecycle contract of an embedding shell that hosts the viewer as one
/// of several tools: the shell calls these when the tool is installed or
/// hidden and when it persists or restores a session.
pub trait ShellPlugin {
    /// Called once when the shell installs the tool.
    fn initialize(&mut self) {}

    /// Called when the shell hides the tool. The viewer keeps no external
    /// resources open, so there is nothing to tear down.
    fn disable(&mut self) {}

    /// Serialized session handed to the shell for persistence, if any.
    fn save(&mut self) -> Option<String> {
        None
    }

    /// Restores a session previously returned by [`ShellPlugin::save`].
    fn load(&mut self, _saved: &str) {}
}
