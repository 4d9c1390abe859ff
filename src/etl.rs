pub mod draw_map;
pub mod fetch_map;

use std::path::Path;

use log::{error, info};

use crate::errors::Result;

/// One stage of the jump pipeline: pull the stage's input together, do the
/// work, and write the result under the output directory. A stage whose
/// output already exists is skipped, which is what makes cached map data
/// replayable without touching the network.
pub trait Etl {
    type Input;
    type Output;

    fn etl_name(&self) -> &str;

    fn is_cached(&self, dir: &Path) -> Result<bool>;
    fn clean(&self, dir: &Path) -> Result<()>;

    fn extract(&mut self, dir: &Path) -> Result<Self::Input>;
    fn transform(&mut self, input: Self::Input) -> Result<Self::Output>;
    fn load(&mut self, dir: &Path, output: Self::Output) -> Result<()>;

    fn process(&mut self, dir: &Path) -> Result<()> {
        info!(etl_name = self.etl_name(); "Starting ETL stage");
        if self.is_cached(dir)? {
            info!(etl_name = self.etl_name(); "Using cached output");
        } else {
            info!(etl_name = self.etl_name(); "Extracting");
            let input = match self.extract(dir) {
                Ok(input) => Ok(input),
                Err(err) => {
                    error!(etl_name = self.etl_name(), err = err.to_string(); "Extraction failed");
                    Err(err)
                }
            }?;

            info!(etl_name = self.etl_name(); "Transforming");
            let output = match self.transform(input) {
                Ok(output) => Ok(output),
                Err(err) => {
                    error!(etl_name = self.etl_name(), err = err.to_string(); "Transformation failed");
                    Err(err)
                }
            }?;

            info!(etl_name = self.etl_name(); "Loading");
            match self.load(dir, output) {
                Ok(()) => Ok(()),
                Err(err) => {
                    error!(etl_name = self.etl_name(), err = err.to_string(); "Loading failed");
                    Err(err)
                }
            }?;
        }
        info!(etl_name = self.etl_name(); "Stage finished");
        Ok(())
    }
}
