use std::path::PathBuf;

use clap::Args;
use quantum_stego_core::media::Window;

use crate::CliResult;

/// Renders the decorative fractal header as PNG
#[derive(Args, Debug)]
pub struct HeaderArgs {
    #[arg(short = 'o', long = "out", value_name = "output image file", required = true)]
    pub write_to_file: PathBuf,

    #[arg(long, default_value_t = 50)]
    pub width: u32,

    #[arg(long, default_value_t = 50)]
    pub height: u32,

    /// Section of the complex plane as x_min,x_max,y_min,y_max
    #[arg(long, value_name = "x_min,x_max,y_min,y_max", value_parser = parse_window)]
    pub window: Option<Window>,
}

impl HeaderArgs {
    pub fn run(self) -> CliResult<()> {
        quantum_stego_core::commands::fractal_header(
            self.width,
            self.height,
            self.window.unwrap_or_default(),
            &self.write_to_file,
        )?;
        println!("{}", self.write_to_file.display());

        Ok(())
    }
}

fn parse_window(s: &str) -> Result<Window, String> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<f64>().map_err(|e| format!("invalid bound {p}: {e}")))
        .collect::<Result<Vec<_>, _>>()?;

    match parts[..] {
        [x_min, x_max, y_min, y_max] => Ok(Window {
            x_min,
            x_max,
            y_min,
            y_max,
        }),
        _ => Err(format!("expected x_min,x_max,y_min,y_max but got {s}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_windows() {
        assert_eq!(
            parse_window("-2,1,-1.5,1.5"),
            Ok(Window::default())
        );
        assert!(parse_window("1,2").is_err());
    }
}
