use crate::render::Hud;

pub struct ScoreKeeper {
    score: u32,
    step: u32,
    playing: bool,
}

impl ScoreKeeper {
    pub fn new(step: u32) -> Self {
        ScoreKeeper { score: 0, step, playing: true }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// No-op once the round is lost.
    pub fn add_score(&mut self) {
        if self.playing {
            self.score = self.score.saturating_add(self.step);
        }
    }

    /// Freezes the score; the round is lost.
    pub fn stop(&mut self) {
        self.playing = false;
    }

    pub fn render<H: Hud + ?Sized>(&self, hud: &mut H) {
        hud.show_score(&self.score.to_string());
    }

    pub fn reload<H: Hud + ?Sized>(&mut self, hud: &mut H) {
        self.score = 0;
        self.playing = true;
        self.render(hud);
    }
}
