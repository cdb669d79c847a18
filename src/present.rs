/// Rendering collaborator. The core requests presentation changes through
/// this interface and never draws anything itself; styling, windowing, and
/// layout are entirely the implementor's concern.
pub trait Presenter {
    fn show_blank(&mut self);
    fn show_stimulus(&mut self, word: &str);
    fn show_feedback(&mut self, message: &str);
    fn show_balance(&mut self, amount: i64);
    fn clear_balance(&mut self);
}

/// Discards everything. Handy for tests and headless replays.
#[derive(Debug, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn show_blank(&mut self) {}
    fn show_stimulus(&mut self, _word: &str) {}
    fn show_feedback(&mut self, _message: &str) {}
    fn show_balance(&mut self, _amount: i64) {}
    fn clear_balance(&mut self) {}
}
