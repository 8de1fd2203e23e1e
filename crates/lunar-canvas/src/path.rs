//! Path
//!
//! Path construction and flattening for the drawing context.

/// Accumulated path commands
#[derive(Debug, Clone, Default)]
pub struct Path {
    commands: Vec<PathCommand>,
    current_x: f64,
    current_y: f64,
    start_x: f64,
    start_y: f64,
}

/// Path command
#[derive(Debug, Clone, Copy)]
pub enum PathCommand {
    MoveTo(f64, f64),
    LineTo(f64, f64),
    QuadraticCurveTo { cpx: f64, cpy: f64, x: f64, y: f64 },
    BezierCurveTo { cp1x: f64, cp1y: f64, cp2x: f64, cp2y: f64, x: f64, y: f64 },
    Arc { x: f64, y: f64, radius: f64, start_angle: f64, end_angle: f64, counterclockwise: bool },
    Rect { x: f64, y: f64, width: f64, height: f64 },
    ClosePath,
}

/// Curve subdivision steps for flattening
const CURVE_STEPS: u32 = 24;

impl Path {
    /// Create new empty path
    pub fn new() -> Self {
        Self::default()
    }

    /// Move to point
    pub fn move_to(&mut self, x: f64, y: f64) {
        self.commands.push(PathCommand::MoveTo(x, y));
        self.current_x = x;
        self.current_y = y;
        self.start_x = x;
        self.start_y = y;
    }

    /// Line to point
    pub fn line_to(&mut self, x: f64, y: f64) {
        self.commands.push(PathCommand::LineTo(x, y));
        self.current_x = x;
        self.current_y = y;
    }

    /// Quadratic curve
    pub fn quadratic_curve_to(&mut self, cpx: f64, cpy: f64, x: f64, y: f64) {
        self.commands.push(PathCommand::QuadraticCurveTo { cpx, cpy, x, y });
        self.current_x = x;
        self.current_y = y;
    }

    /// Bezier curve
    pub fn bezier_curve_to(&mut self, cp1x: f64, cp1y: f64, cp2x: f64, cp2y: f64, x: f64, y: f64) {
        self.commands.push(PathCommand::BezierCurveTo { cp1x, cp1y, cp2x, cp2y, x, y });
        self.current_x = x;
        self.current_y = y;
    }

    /// Arc around (x, y)
    pub fn arc(&mut self, x: f64, y: f64, radius: f64, start_angle: f64, end_angle: f64, counterclockwise: bool) {
        self.commands.push(PathCommand::Arc { x, y, radius, start_angle, end_angle, counterclockwise });
        self.current_x = x + radius * end_angle.cos();
        self.current_y = y + radius * end_angle.sin();
    }

    /// Rectangle subpath
    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.commands.push(PathCommand::Rect { x, y, width, height });
        self.current_x = x;
        self.current_y = y;
        self.start_x = x;
        self.start_y = y;
    }

    /// Close path back to the subpath start
    pub fn close_path(&mut self) {
        self.commands.push(PathCommand::ClosePath);
        self.current_x = self.start_x;
        self.current_y = self.start_y;
    }

    /// Get commands
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Flatten into polylines, one per subpath. Curves and arcs are
    /// subdivided into line segments in user space.
    pub fn flatten(&self) -> Vec<Vec<(f64, f64)>> {
        let mut subpaths: Vec<Vec<(f64, f64)>> = Vec::new();
        let mut current: Vec<(f64, f64)> = Vec::new();
        let mut start = (0.0, 0.0);

        for command in &self.commands {
            match *command {
                PathCommand::MoveTo(x, y) => {
                    if current.len() > 1 {
                        subpaths.push(std::mem::take(&mut current));
                    } else {
                        current.clear();
                    }
                    start = (x, y);
                    current.push((x, y));
                }
                PathCommand::LineTo(x, y) => {
                    if current.is_empty() {
                        start = (x, y);
                    }
                    current.push((x, y));
                }
                PathCommand::QuadraticCurveTo { cpx, cpy, x, y } => {
                    let (x0, y0) = *current.last().unwrap_or(&(cpx, cpy));
                    for i in 1..=CURVE_STEPS {
                        let t = i as f64 / CURVE_STEPS as f64;
                        let u = 1.0 - t;
                        let px = u * u * x0 + 2.0 * u * t * cpx + t * t * x;
                        let py = u * u * y0 + 2.0 * u * t * cpy + t * t * y;
                        current.push((px, py));
                    }
                }
                PathCommand::BezierCurveTo { cp1x, cp1y, cp2x, cp2y, x, y } => {
                    let (x0, y0) = *current.last().unwrap_or(&(cp1x, cp1y));
                    for i in 1..=CURVE_STEPS {
                        let t = i as f64 / CURVE_STEPS as f64;
                        let u = 1.0 - t;
                        let px = u * u * u * x0
                            + 3.0 * u * u * t * cp1x
                            + 3.0 * u * t * t * cp2x
                            + t * t * t * x;
                        let py = u * u * u * y0
                            + 3.0 * u * u * t * cp1y
                            + 3.0 * u * t * t * cp2y
                            + t * t * t * y;
                        current.push((px, py));
                    }
                }
                PathCommand::Arc { x, y, radius, start_angle, end_angle, counterclockwise } => {
                    let mut sweep = end_angle - start_angle;
                    if counterclockwise {
                        if sweep > 0.0 {
                            sweep -= std::f64::consts::TAU;
                        }
                    } else if sweep < 0.0 {
                        sweep += std::f64::consts::TAU;
                    }
                    let steps = CURVE_STEPS.max((sweep.abs() * 8.0) as u32);
                    if current.is_empty() {
                        start = (x + radius * start_angle.cos(), y + radius * start_angle.sin());
                    }
                    for i in 0..=steps {
                        let angle = start_angle + sweep * (i as f64 / steps as f64);
                        current.push((x + radius * angle.cos(), y + radius * angle.sin()));
                    }
                }
                PathCommand::Rect { x, y, width, height } => {
                    if current.len() > 1 {
                        subpaths.push(std::mem::take(&mut current));
                    } else {
                        current.clear();
                    }
                    subpaths.push(vec![
                        (x, y),
                        (x + width, y),
                        (x + width, y + height),
                        (x, y + height),
                        (x, y),
                    ]);
                    start = (x, y);
                    current.push((x, y));
                }
                PathCommand::ClosePath => {
                    if !current.is_empty() {
                        current.push(start);
                    }
                }
            }
        }

        if current.len() > 1 {
            subpaths.push(current);
        }
        subpaths
    }
}
