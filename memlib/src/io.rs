use std::fs::File;
use std::ops::Deref;

/// The bytes of a trace file, memory mapped where the platform allows it
pub enum TraceData {
    #[cfg(unix)]
    Mapped(memmap2::Mmap),
    Buffered(Vec<u8>),
}

impl Deref for TraceData {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            #[cfg(unix)]
            TraceData::Mapped(mapped) => mapped,
            TraceData::Buffered(buffered) => buffered,
        }
    }
}

/// Reads a whole trace file into memory
pub fn read_trace(file: File) -> Result<TraceData, String> {
    // Compatibility on other systems
    #[cfg(not(unix))]
    {
        use std::io::Read;
        let mut file = file;
        let mut buffered = Vec::new();
        file.read_to_end(&mut buffered)
            .map_err(|e| format!("Couldn't read the trace file: {e}"))?;
        Ok(TraceData::Buffered(buffered))
    }
    // Memory map the file for speed on unix systems. The replay walks the
    // trace front to back exactly once, which is what Advice::Sequential tells
    // the OS to expect
    #[cfg(unix)]
    {
        use memmap2::{Advice, Mmap};
        unsafe {
            let mapped = Mmap::map(&file)
                .map_err(|e| format!("Couldn't memory map the file: {e}"))?;
            mapped
                .advise(Advice::Sequential)
                .map_err(|e| format!("Failed to provide access advice to the OS, {e}"))?;
            Ok(TraceData::Mapped(mapped))
        }
    }
}
