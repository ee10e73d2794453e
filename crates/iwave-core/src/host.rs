//! Interactive host loop state: pause flag, paint target and display,
//! driven by commands instead of window events.

use crate::display::DisplayMap;
use crate::paint::{Brush, PaintMode};
use crate::simulation::{Simulation, StepTimings};
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCommand {
    ZoomIn,
    ZoomOut,
    TogglePause,
    SelectPaint(PaintMode),
    /// Clears waves, obstruction and pending sources.
    Reset,
}

impl HostCommand {
    pub fn from_key(key: char) -> Option<Self> {
        match key {
            '+' | '=' => Some(HostCommand::ZoomIn),
            '-' | '_' => Some(HostCommand::ZoomOut),
            ' ' => Some(HostCommand::TogglePause),
            'o' => Some(HostCommand::SelectPaint(PaintMode::Obstruction)),
            's' => Some(HostCommand::SelectPaint(PaintMode::Source)),
            'b' => Some(HostCommand::Reset),
            _ => None,
        }
    }
}

pub struct Host {
    simulation: Simulation,
    display: DisplayMap,
    running: bool,
    paint_mode: PaintMode,
}

impl Host {
    pub fn new(simulation: Simulation) -> Self {
        let grid = simulation.grid();
        let mut display = DisplayMap::new(grid.width(), grid.height());
        display.refresh(grid);
        Self {
            simulation,
            display,
            running: true,
            paint_mode: PaintMode::default(),
        }
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    pub fn simulation_mut(&mut self) -> &mut Simulation {
        &mut self.simulation
    }

    pub fn display(&self) -> &DisplayMap {
        &self.display
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn paint_mode(&self) -> PaintMode {
        self.paint_mode
    }

    pub fn apply(&mut self, command: HostCommand) {
        debug!("host command {command:?}");
        match command {
            HostCommand::ZoomIn => self.display.zoom_in(),
            HostCommand::ZoomOut => self.display.zoom_out(),
            HostCommand::TogglePause => self.running = !self.running,
            HostCommand::SelectPaint(mode) => self.paint_mode = mode,
            HostCommand::Reset => {
                self.simulation.clear_waves();
                self.simulation.clear_obstruction();
                self.simulation.clear_source();
            }
        }
    }

    /// Returns whether the key was bound.
    pub fn key(&mut self, key: char) -> bool {
        match HostCommand::from_key(key) {
            Some(command) => {
                self.apply(command);
                true
            }
            None => false,
        }
    }

    /// Dab the current brush at grid coordinates.
    pub fn paint(&mut self, x: isize, y: isize) -> usize {
        let mode = self.paint_mode;
        Brush::for_mode(mode).dab(self.simulation.grid_mut(), mode, x, y)
    }

    /// Dab at window coordinates, whose origin is the top-left corner.
    pub fn paint_window(&mut self, x: isize, y: isize) -> usize {
        let grid_y = self.simulation.grid().height() as isize - 1 - y;
        self.paint(x, grid_y)
    }

    /// One animation frame: step unless paused, then rebuild the display.
    pub fn tick(&mut self) -> Option<StepTimings> {
        let timings = self.running.then(|| self.simulation.step());
        self.display.refresh(self.simulation.grid());
        timings
    }
}
