use crate::calculator::Calculator;
use crate::model::{self, LineMap, ProductionStatus};
use crate::poller::{AppEvent, PollerCommand};
use chrono::{DateTime, Local};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

/// The three dashboard pages, as tabs sharing one render module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Line-status grid only.
    Status,
    /// Grid plus summary cards and the production chart.
    Production,
    /// Everything, plus line toggles, target editor and calculator.
    Control,
}

impl View {
    pub fn next(self) -> Self {
        match self {
            View::Status => View::Production,
            View::Production => View::Control,
            View::Control => View::Status,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            View::Status => "Status",
            View::Production => "Production",
            View::Control => "Control",
        }
    }
}

/// Which pane of the control view owns the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFocus {
    Lines,
    Targets,
    Calculator,
}

impl ControlFocus {
    fn next(self) -> Self {
        match self {
            ControlFocus::Lines => ControlFocus::Targets,
            ControlFocus::Targets => ControlFocus::Calculator,
            ControlFocus::Calculator => ControlFocus::Lines,
        }
    }

    fn prev(self) -> Self {
        match self {
            ControlFocus::Lines => ControlFocus::Calculator,
            ControlFocus::Targets => ControlFocus::Lines,
            ControlFocus::Calculator => ControlFocus::Targets,
        }
    }
}

#[derive(Debug)]
pub struct Notice {
    pub kind: &'static str,
    pub text: String,
}

pub struct App {
    /// Last successfully fetched payload. A failed poll never clears it.
    pub status: Option<ProductionStatus>,
    /// Line statuses, shared by every view's grid. Updated by full polls
    /// and by the status view's manual refresh.
    pub lines: Option<LineMap>,
    pub fetched_at: Option<DateTime<Local>>,

    pub view: View,
    pub focus: ControlFocus,

    pub selected_line: usize,
    pub selected_target: usize,
    pub target_input: Option<String>,

    pub calculator: Calculator,
    pub notices: Vec<Notice>,

    tx: UnboundedSender<PollerCommand>,
    rx: UnboundedReceiver<AppEvent>,
}

impl App {
    pub fn new(tx: UnboundedSender<PollerCommand>, rx: UnboundedReceiver<AppEvent>) -> Self {
        Self {
            status: None,
            lines: None,
            fetched_at: None,
            view: View::Status,
            focus: ControlFocus::Lines,
            selected_line: 0,
            selected_target: 0,
            target_input: None,
            calculator: Calculator::new(),
            notices: vec![Notice {
                kind: "system",
                text: "Waiting for first poll. Tab switches views, q quits.".into(),
            }],
            tx,
            rx,
        }
    }

    /// Line entries in display order, shared with the renderer so the
    /// selection index always refers to what is on screen.
    pub fn line_entries(&self) -> Vec<model::LineEntry> {
        self.lines
            .as_ref()
            .map(model::flatten_lines)
            .unwrap_or_default()
    }

    /// Material names in display order for the target editor.
    pub fn target_materials(&self) -> Vec<String> {
        let mut materials: Vec<String> = self
            .status
            .as_ref()
            .map(|s| s.material_targets.keys().cloned().collect())
            .unwrap_or_default();
        materials.sort();
        materials
    }

    /// Drains pending poller events without blocking.
    pub async fn poll_async(&mut self) {
        while let Ok(ev) = self.rx.try_recv() {
            match ev {
                AppEvent::Status(status) => {
                    self.lines = Some(status.manufact_lines.clone());
                    self.status = Some(status);
                    self.fetched_at = Some(Local::now());
                }
                AppEvent::Lines(lines) => {
                    if let Some(status) = &mut self.status {
                        status.manufact_lines = lines.clone();
                    }
                    self.lines = Some(lines);
                    self.fetched_at = Some(Local::now());
                }
                AppEvent::LineToggled {
                    material,
                    coordinate,
                    enabled,
                } => {
                    if let Some(lines) = &mut self.lines {
                        if let Some(coords) = lines.get_mut(&material) {
                            if let Some(flag) = coords.get_mut(&coordinate) {
                                *flag = enabled;
                            }
                        }
                    }
                    let state = if enabled { "running" } else { "stopped" };
                    self.add_notice("info", format!("Line {material} {coordinate} {state}."));
                }
                AppEvent::TargetSet {
                    material,
                    target_amount,
                } => {
                    if let Some(status) = &mut self.status {
                        status.material_targets.insert(material.clone(), target_amount);
                    }
                    self.add_notice("info", format!("Target for {material} set to {target_amount}."));
                }
                AppEvent::CalcResult(outcome) => {
                    self.calculator.apply_result(outcome);
                }
                AppEvent::ActionFailed(text) => {
                    self.add_notice("error", text);
                }
            }
        }
    }

    /// Handles one terminal event. Returns true when the app should quit.
    pub fn on_event(&mut self, ev: crossterm::event::Event) -> bool {
        use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};

        let Event::Key(k) = ev else { return false };
        if k.modifiers.contains(KeyModifiers::CONTROL) && matches!(k.code, KeyCode::Char('c')) {
            return true;
        }
        if k.kind != KeyEventKind::Press {
            return false;
        }

        // Target editing captures the keyboard until committed or cancelled.
        if self.target_input.is_some() {
            self.on_target_edit_key(k.code);
            return false;
        }

        match k.code {
            KeyCode::Tab => {
                self.view = self.view.next();
                self.focus = ControlFocus::Lines;
            }
            KeyCode::Char('q') if self.focus != ControlFocus::Calculator => return true,
            _ => match self.view {
                View::Status => {
                    if let KeyCode::Char('r') = k.code {
                        let _ = self.tx.send(PollerCommand::RefreshLines);
                    }
                }
                View::Production => {}
                View::Control => self.on_control_key(k.code),
            },
        }
        false
    }

    fn on_control_key(&mut self, code: crossterm::event::KeyCode) {
        use crossterm::event::KeyCode;

        match code {
            KeyCode::Right => self.focus = self.focus.next(),
            KeyCode::Left => self.focus = self.focus.prev(),
            KeyCode::Esc => self.focus = ControlFocus::Lines,
            _ => match self.focus {
                ControlFocus::Lines => match code {
                    KeyCode::Up => self.selected_line = self.selected_line.saturating_sub(1),
                    KeyCode::Down => {
                        let count = self.line_entries().len();
                        if self.selected_line + 1 < count {
                            self.selected_line += 1;
                        }
                    }
                    KeyCode::Char(' ') | KeyCode::Enter => self.toggle_selected_line(),
                    _ => {}
                },
                ControlFocus::Targets => match code {
                    KeyCode::Up => self.selected_target = self.selected_target.saturating_sub(1),
                    KeyCode::Down => {
                        let count = self.target_materials().len();
                        if self.selected_target + 1 < count {
                            self.selected_target += 1;
                        }
                    }
                    KeyCode::Enter | KeyCode::Char('e') => self.start_target_edit(),
                    _ => {}
                },
                ControlFocus::Calculator => self.on_calculator_key(code),
            },
        }
    }

    fn on_calculator_key(&mut self, code: crossterm::event::KeyCode) {
        use crossterm::event::KeyCode;

        match code {
            KeyCode::Char(c @ ('0'..='9' | '.')) => self.calculator.press_digit(c),
            KeyCode::Char(c @ ('+' | '-')) => self.calculator.press_operator(c),
            KeyCode::Char('*') => self.calculator.press_operator('×'),
            KeyCode::Char('/') => self.calculator.press_operator('÷'),
            KeyCode::Char('=') | KeyCode::Enter => {
                let _ = self.tx.send(PollerCommand::Calculate {
                    expression: self.calculator.expression(),
                });
            }
            KeyCode::Backspace | KeyCode::Delete | KeyCode::Char('C') => self.calculator.clear(),
            _ => {}
        }
    }

    fn on_target_edit_key(&mut self, code: crossterm::event::KeyCode) {
        use crossterm::event::KeyCode;

        match code {
            KeyCode::Char(c) if !c.is_control() => {
                if let Some(input) = &mut self.target_input {
                    input.push(c);
                }
            }
            KeyCode::Backspace => {
                if let Some(input) = &mut self.target_input {
                    input.pop();
                }
            }
            KeyCode::Enter => self.commit_target_edit(),
            KeyCode::Esc => self.target_input = None,
            _ => {}
        }
    }

    fn toggle_selected_line(&mut self) {
        let entries = self.line_entries();
        let Some(entry) = entries.get(self.selected_line) else {
            return;
        };
        let _ = self.tx.send(PollerCommand::ToggleLine {
            material: entry.material.clone(),
            coordinate: entry.coord.clone(),
            enabled: !entry.running,
        });
    }

    fn start_target_edit(&mut self) {
        let materials = self.target_materials();
        if let Some(material) = materials.get(self.selected_target) {
            let current = self
                .status
                .as_ref()
                .and_then(|s| s.material_targets.get(material))
                .copied()
                .unwrap_or(0);
            self.target_input = Some(current.to_string());
        }
    }

    fn commit_target_edit(&mut self) {
        let Some(input) = self.target_input.take() else {
            return;
        };
        let materials = self.target_materials();
        let Some(material) = materials.get(self.selected_target) else {
            return;
        };
        match model::parse_target(&input) {
            Some(target_amount) => {
                let _ = self.tx.send(PollerCommand::SetTarget {
                    material: material.clone(),
                    target_amount,
                });
            }
            None => {
                self.add_notice(
                    "error",
                    format!("Invalid target '{input}': enter a non-negative integer."),
                );
            }
        }
    }

    pub fn add_notice(&mut self, kind: &'static str, text: String) {
        self.notices.push(Notice { kind, text });
    }

    pub fn last_notice(&self) -> Option<&Notice> {
        self.notices.last()
    }
}
