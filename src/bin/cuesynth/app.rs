//! Cue browser: pick a cue, hear it.

use std::time::Duration;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{widgets::ListState, DefaultTerminal};

use cuesynth::{
    cues::{CueKind, RotateDirection},
    SoundEngine, UserGesture,
};

use crate::ui;

const VOLUME_STEP: f32 = 0.05;
const CUSP_STEP: f32 = 0.25;

pub struct App {
    pub engine: SoundEngine,
    pub list_state: ListState,
    pub last_cue: Option<(CueKind, bool)>,
    rotate: RotateDirection,
    verification_success: bool,
    cusp_parameter: f32,
    should_quit: bool,
}

impl App {
    pub fn new(engine: SoundEngine) -> Self {
        Self {
            engine,
            list_state: ListState::default().with_selected(Some(0)),
            last_cue: None,
            rotate: RotateDirection::Clockwise,
            verification_success: true,
            cusp_parameter: 0.0,
            should_quit: false,
        }
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            // Stagger entries are only built when the loop comes round
            self.engine.update();

            terminal.draw(|frame| ui::render(frame, self))?;

            // ~60fps
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }
        Ok(())
    }

    pub fn selected(&self) -> CueKind {
        let index = self.list_state.selected().unwrap_or(0);
        CueKind::ALL[index.min(CueKind::ALL.len() - 1)]
    }

    /// Argument the next parameterised cue will be played with.
    pub fn argument(&self, kind: CueKind) -> Option<String> {
        match kind {
            CueKind::PrismRotate => Some(format!("{:?}", self.rotate)),
            CueKind::VerificationResult => Some(
                if self.verification_success {
                    "success"
                } else {
                    "failure"
                }
                .to_string(),
            ),
            CueKind::CuspTransition => Some(format!("{:.2}", self.cusp_parameter)),
            _ => None,
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        // Any key press counts as the gesture that unlocks audio output
        if !self.engine.is_initialized() {
            self.engine.initialize(UserGesture::confirmed());
        }
        self.engine.resume();

        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => self.list_state.select_previous(),
            KeyCode::Down | KeyCode::Char('j') => self.list_state.select_next(),
            KeyCode::Enter | KeyCode::Char(' ') => self.fire(self.selected()),
            KeyCode::Char('m') => {
                let enabled = !self.engine.is_enabled();
                self.engine.set_enabled(enabled);
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                let volume = self.engine.master_volume() + VOLUME_STEP;
                self.engine.set_master_volume(volume);
            }
            KeyCode::Char('-') => {
                let volume = self.engine.master_volume() - VOLUME_STEP;
                self.engine.set_master_volume(volume);
            }
            _ => {}
        }
    }

    fn fire(&mut self, kind: CueKind) {
        let engine = &mut self.engine;
        let fired = match kind {
            CueKind::LightEnter => engine.play_light_enter(),
            CueKind::Dispersion => engine.play_dispersion(),
            CueKind::PrismRotate => {
                let fired = engine.play_prism_rotate(self.rotate);
                self.rotate = match self.rotate {
                    RotateDirection::Clockwise => RotateDirection::CounterClockwise,
                    RotateDirection::CounterClockwise => RotateDirection::Clockwise,
                };
                fired
            }
            CueKind::NodeHover => engine.play_node_hover(),
            CueKind::NodeClick => engine.play_node_click(),
            CueKind::LatticeActivate => engine.play_lattice_activate(),
            CueKind::MirrorActivate => engine.play_mirror_activate(),
            CueKind::InfiniteReflection => engine.play_infinite_reflection(),
            CueKind::Keypress => engine.play_keypress(),
            CueKind::VerificationResult => {
                let fired = engine.play_verification_result(self.verification_success);
                self.verification_success = !self.verification_success;
                fired
            }
            CueKind::Strike => engine.play_strike(),
            CueKind::Pour => engine.play_pour(),
            CueKind::Quench => engine.play_quench(),
            CueKind::GalleryEnter => engine.play_gallery_enter(),
            CueKind::CuspTransition => {
                let fired = engine.play_cusp_transition(self.cusp_parameter);
                self.cusp_parameter = (self.cusp_parameter + CUSP_STEP) % (1.0 + CUSP_STEP);
                fired
            }
        };
        self.last_cue = Some((kind, fired));
    }
}
