use iwave_core::{Host, HostCommand, PaintMode, SimConfig, Simulation};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

/// Minimal PyO3 module exposing iwave-core to Python.
#[pyfunction]
fn version() -> &'static str {
    "0.1.0"
}

/// Host-driven wave simulation: painting, stepping and display in one object.
#[pyclass(name = "WaveSimulation")]
struct WaveSimulation {
    host: Host,
}

#[pymethods]
impl WaveSimulation {
    #[new]
    #[pyo3(signature = (width=None, height=None, config_json=None))]
    fn new(
        width: Option<usize>,
        height: Option<usize>,
        config_json: Option<&str>,
    ) -> PyResult<Self> {
        let config = match config_json {
            Some(text) => serde_json::from_str::<SimConfig>(text)
                .map_err(|e| PyValueError::new_err(e.to_string()))?,
            None => SimConfig::default(),
        }
        .with_size(width, height);
        let simulation =
            Simulation::try_new(config).map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(Self {
            host: Host::new(simulation),
        })
    }

    #[getter]
    fn width(&self) -> usize {
        self.host.simulation().grid().width()
    }

    #[getter]
    fn height(&self) -> usize {
        self.host.simulation().grid().height()
    }

    #[getter]
    fn running(&self) -> bool {
        self.host.is_running()
    }

    #[getter]
    fn step_index(&self) -> usize {
        self.host.simulation().step_index()
    }

    /// Advance one step regardless of the pause flag.
    fn step(&mut self) {
        self.host.simulation_mut().step();
    }

    /// One animation frame; returns whether a step was taken.
    fn tick(&mut self) -> bool {
        self.host.tick().is_some()
    }

    fn key(&mut self, key: char) -> bool {
        self.host.key(key)
    }

    fn set_paint_mode(&mut self, mode: &str) -> PyResult<()> {
        let mode = PaintMode::from_str(mode)
            .ok_or_else(|| PyValueError::new_err(format!("unknown paint mode: {mode}")))?;
        self.host.apply(HostCommand::SelectPaint(mode));
        Ok(())
    }

    fn paint(&mut self, x: isize, y: isize) -> usize {
        self.host.paint(x, y)
    }

    fn paint_window(&mut self, x: isize, y: isize) -> usize {
        self.host.paint_window(x, y)
    }

    fn clear_waves(&mut self) {
        self.host.simulation_mut().clear_waves();
    }

    fn clear_obstruction(&mut self) {
        self.host.simulation_mut().clear_obstruction();
    }

    fn clear_source(&mut self) {
        self.host.simulation_mut().clear_source();
    }

    fn heights(&self) -> Vec<f32> {
        self.host.simulation().grid().heights().to_vec()
    }

    fn obstruction(&self) -> Vec<f32> {
        self.host.simulation().grid().obstruction().to_vec()
    }

    fn display(&self) -> Vec<f32> {
        self.host.display().pixels().to_vec()
    }

    /// JSON-encoded metrics for the current field.
    fn metrics_json(&self) -> PyResult<String> {
        serde_json::to_string(&self.host.simulation().metrics())
            .map_err(|e| PyValueError::new_err(e.to_string()))
    }
}

#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(version, m)?)?;
    m.add_class::<WaveSimulation>()?;
    Ok(())
}
