//! Interactive parameter surface: holds the current curve and view settings,
//! maps key presses to changes and recomputes the dataset after each one.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::Frame;
use tracing::{debug, warn};

use crate::color::RgbColor;
use crate::config::{Config, D_RANGE, N_RANGE, POINT_SIZE_RANGE};
use crate::curve::{self, CurveDataset, CurveParams};
use crate::error::CurveError;
use crate::render::{self, Camera, RenderStyle, ViewMode};

const POINT_SIZE_STEP: f32 = 0.25;
const ROTATE_STEP: f64 = 0.1;

/// What the display loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Redraw,
    Save,
    Quit,
    Ignored,
}

pub struct ViewerState {
    pub params: CurveParams,
    /// Step from the config, kept across family changes
    step_override: Option<f64>,
    pub view: ViewMode,
    pub camera: Camera,
    pub style: RenderStyle,
    dataset: CurveDataset,
    error: Option<CurveError>,
    notice: Option<String>,
}

impl ViewerState {
    pub fn from_config(config: &Config) -> Self {
        let mut state = Self {
            params: config.curve_params(),
            step_override: config.curve.step,
            view: config.view.mode,
            camera: config.camera(),
            style: config.render_style(),
            dataset: CurveDataset::default(),
            error: None,
            notice: None,
        };
        state.recompute();
        state
    }

    pub fn dataset(&self) -> &CurveDataset {
        &self.dataset
    }

    pub fn error(&self) -> Option<&CurveError> {
        self.error.as_ref()
    }

    /// Regenerate the dataset from the current parameters.
    pub fn recompute(&mut self) {
        match curve::generate(&self.params) {
            Ok(dataset) => {
                debug!(
                    family = self.params.family.name(),
                    n = self.params.n,
                    d = self.params.d,
                    points = dataset.len(),
                    "recomputed curve"
                );
                self.dataset = dataset;
                self.error = None;
            }
            Err(e) => {
                warn!("Failed to sample curve: {}", e);
                self.dataset = CurveDataset::default();
                self.error = Some(e);
            }
        }
    }

    pub fn next_family(&mut self) {
        let family = self.params.family.next();
        self.params.family = family;
        self.params.step = self.step_override.unwrap_or(family.default_step());
        self.recompute();
    }

    pub fn adjust_n(&mut self, delta: i64) {
        self.params.n = step_within(self.params.n, delta, N_RANGE);
        self.recompute();
    }

    pub fn adjust_d(&mut self, delta: i64) {
        self.params.d = step_within(self.params.d, delta, D_RANGE);
        self.recompute();
    }

    pub fn toggle_view(&mut self) {
        self.view = self.view.toggle();
        self.recompute();
    }

    pub fn adjust_point_size(&mut self, delta: f32) {
        let (min, max) = POINT_SIZE_RANGE;
        self.style.point_size = (self.style.point_size + delta).clamp(min, max);
        self.recompute();
    }

    pub fn next_color(&mut self) {
        self.style.color = self.style.color.next_preset();
        self.recompute();
    }

    pub fn next_background(&mut self) {
        self.style.background_color = self.style.background_color.next_preset();
        self.recompute();
    }

    pub fn rotate_camera(&mut self, d_yaw: f64, d_pitch: f64) {
        self.camera.rotate(d_yaw, d_pitch);
        self.recompute();
    }

    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        self.notice = None;
        match key {
            KeyEvent {
                code: KeyCode::Char('q'),
                ..
            }
            | KeyEvent {
                code: KeyCode::Esc,
                ..
            }
            | KeyEvent {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL,
                ..
            } => return Action::Quit,
            // Only plain and shifted keys drive the controls.
            KeyEvent { modifiers, .. } if !KeyModifiers::SHIFT.contains(modifiers) => {
                return Action::Ignored
            }
            KeyEvent {
                code: KeyCode::Char('w'),
                ..
            } => return Action::Save,
            KeyEvent {
                code: KeyCode::Char('c'),
                ..
            } => self.next_color(),
            KeyEvent {
                code: KeyCode::Char('b'),
                ..
            } => self.next_background(),
            KeyEvent {
                code: KeyCode::Char('f'),
                ..
            } => self.next_family(),
            KeyEvent {
                code: KeyCode::Char('v'),
                ..
            } => self.toggle_view(),
            KeyEvent {
                code: KeyCode::Char('n'),
                ..
            } => self.adjust_n(1),
            KeyEvent {
                code: KeyCode::Char('N'),
                ..
            } => self.adjust_n(-1),
            KeyEvent {
                code: KeyCode::Char('d'),
                ..
            } => self.adjust_d(1),
            KeyEvent {
                code: KeyCode::Char('D'),
                ..
            } => self.adjust_d(-1),
            KeyEvent {
                code: KeyCode::Char('+') | KeyCode::Char('='),
                ..
            } => self.adjust_point_size(POINT_SIZE_STEP),
            KeyEvent {
                code: KeyCode::Char('-'),
                ..
            } => self.adjust_point_size(-POINT_SIZE_STEP),
            KeyEvent {
                code: KeyCode::Left,
                ..
            } => self.rotate_camera(-ROTATE_STEP, 0.0),
            KeyEvent {
                code: KeyCode::Right,
                ..
            } => self.rotate_camera(ROTATE_STEP, 0.0),
            KeyEvent {
                code: KeyCode::Up,
                ..
            } => self.rotate_camera(0.0, ROTATE_STEP),
            KeyEvent {
                code: KeyCode::Down,
                ..
            } => self.rotate_camera(0.0, -ROTATE_STEP),
            _ => return Action::Ignored,
        }
        Action::Redraw
    }

    /// Copy the current settings into `config` for saving.
    pub fn apply_to(&self, config: &mut Config) {
        config.curve.family = self.params.family;
        config.curve.n = self.params.n;
        config.curve.d = self.params.d;
        config.curve.step = self.step_override;
        config.view.mode = self.view;
        config.view.yaw = self.camera.yaw;
        config.view.pitch = self.camera.pitch;
        config.style.point_size = self.style.point_size;
        config.style.color = self.style.color;
        config.style.background_color = self.style.background_color;
        config.style.width = self.style.width;
        config.style.height = self.style.height;
    }

    pub fn status_line(&self) -> String {
        if let Some(e) = &self.error {
            return format!(" error: {} | [q]uit ", e);
        }
        if let Some(notice) = &self.notice {
            return format!(" {} ", notice);
        }
        let k = self.params.k().unwrap_or(f64::NAN);
        format!(
            " [f] {} | [n/N] n={} | [d/D] d={} | k={:.4} | [v] {} | {} pts | [+/-] size {:.2} | [c/b] {}/{} | [w]rite | [q]uit ",
            self.params.family.name(),
            self.params.n,
            self.params.d,
            k,
            self.view.name(),
            self.dataset.len(),
            self.style.point_size,
            color_label(self.style.color),
            color_label(self.style.background_color),
        )
    }

    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        self.draw(frame.buffer_mut(), area);
    }

    /// Status line on the first row, plot below it.
    pub fn draw(&self, buf: &mut Buffer, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(area);

        let status_style = if self.error.is_some() {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        buf.set_stringn(
            chunks[0].x,
            chunks[0].y,
            self.status_line(),
            chunks[0].width as usize,
            status_style,
        );

        render::render_dataset(buf, chunks[1], &self.dataset, self.view, &self.camera, &self.style);
    }
}

fn color_label(color: RgbColor) -> String {
    color
        .preset_name()
        .map(str::to_string)
        .unwrap_or_else(|| color.to_string())
}

fn step_within(value: u32, delta: i64, (min, max): (u32, u32)) -> u32 {
    (i64::from(value) + delta).clamp(i64::from(min), i64::from(max)) as u32
}
