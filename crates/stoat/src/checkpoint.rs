// Checkpoint — Save and load model parameters
//
// Binary checkpoint format (.tnn):
//
//   Header:
//     magic:   [u8; 4]  = b"TNN1"
//     version: u32 LE   = 1
//     count:   u32 LE   = number of parameter records
//
//   For each parameter, in named_parameters() traversal order:
//     name_len: u32 LE
//     name:     [u8; name_len]  (UTF-8, e.g. "0.W")
//     rows:     u32 LE
//     cols:     u32 LE
//     data:     [f32 LE; rows * cols]  (row-major)
//
// Only parameter values are persisted. Gradients and optimizer moments are
// never written and never touched on load. Loading overwrites matching
// parameters in place; model parameters absent from the file keep their
// current values.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use stoat_core::{Error, Result, Tensor};
use stoat_nn::Module;

// Constants

const MAGIC: &[u8; 4] = b"TNN1";
const VERSION: u32 = 1;

// Low-level IO helpers

fn write_u32(w: &mut impl Write, v: u32) -> std::io::Result<()> {
    w.write_all(&v.to_le_bytes())
}

fn write_f32(w: &mut impl Write, v: f32) -> std::io::Result<()> {
    w.write_all(&v.to_le_bytes())
}

fn read_u32(r: &mut impl Read) -> std::io::Result<u32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

fn read_f32(r: &mut impl Read) -> std::io::Result<f32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(f32::from_le_bytes(buf))
}

fn read_bytes(r: &mut impl Read, len: usize) -> std::io::Result<Vec<u8>> {
    let mut buf = vec![0u8; len];
    r.read_exact(&mut buf)?;
    Ok(buf)
}

// Write checkpoint

/// Write a model's parameters to a writer in the checkpoint format.
///
/// Records appear in `named_parameters()` traversal order.
pub fn write_checkpoint(writer: &mut impl Write, model: &dyn Module) -> Result<()> {
    let params = model.named_parameters();

    // Header
    writer.write_all(MAGIC)?;
    write_u32(writer, VERSION)?;
    write_u32(writer, params.len() as u32)?;

    // Each parameter
    for p in &params {
        let name_bytes = p.name.as_bytes();
        write_u32(writer, name_bytes.len() as u32)?;
        writer.write_all(name_bytes)?;

        write_u32(writer, p.value.rows() as u32)?;
        write_u32(writer, p.value.cols() as u32)?;
        for &v in p.value.data() {
            write_f32(writer, v)?;
        }
    }

    Ok(())
}

/// Read parameters from a reader into a model, overwriting matching tensors
/// in place.
///
/// Fails on a wrong magic or version, on a record whose name the model does
/// not have, on a shape mismatch, or on a truncated stream. Model parameters
/// not mentioned in the stream are left untouched.
///
/// Returns the number of parameters loaded.
pub fn read_checkpoint(reader: &mut impl Read, model: &mut dyn Module) -> Result<usize> {
    // Header
    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    if &magic != MAGIC {
        return Err(Error::InvalidCheckpoint(format!(
            "expected magic {:?}, got {:?}",
            MAGIC, magic
        )));
    }

    let version = read_u32(reader)?;
    if version != VERSION {
        return Err(Error::InvalidCheckpoint(format!(
            "unsupported version {version} (expected {VERSION})"
        )));
    }

    let count = read_u32(reader)? as usize;

    let mut targets: HashMap<String, &mut Tensor> = model
        .named_parameters_mut()
        .into_iter()
        .map(|p| (p.name, p.value))
        .collect();

    for _ in 0..count {
        let name_len = read_u32(reader)? as usize;
        let name_bytes = read_bytes(reader, name_len)?;
        let name = String::from_utf8(name_bytes)
            .map_err(|e| Error::InvalidCheckpoint(format!("invalid UTF-8 name: {e}")))?;

        let rows = read_u32(reader)? as usize;
        let cols = read_u32(reader)? as usize;

        // Resolve the target and validate the shape before touching the
        // payload: the record header is untrusted, and a corrupt dimension
        // pair must fail here rather than drive a huge allocation.
        let target = targets.get_mut(&name).ok_or_else(|| {
            Error::InvalidCheckpoint(format!("model has no parameter named {name:?}"))
        })?;
        if target.shape() != (rows, cols) {
            return Err(Error::InvalidCheckpoint(format!(
                "parameter {name:?} has shape {}, checkpoint holds ({rows}, {cols})",
                target.shape_str()
            )));
        }

        let mut data = Vec::with_capacity(rows * cols);
        for _ in 0..rows * cols {
            data.push(read_f32(reader)?);
        }
        let incoming = Tensor::from_vec(rows, cols, data)?;
        target.copy_from(&incoming)?;
    }

    Ok(count)
}

// High-level API — save/load to a file path

/// Save a model's parameters to a file.
pub fn save(path: impl AsRef<Path>, model: &dyn Module) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    write_checkpoint(&mut writer, model)?;
    writer.flush()?;
    Ok(())
}

/// Load a model's parameters from a file. Returns the number of parameters
/// loaded.
pub fn load(path: impl AsRef<Path>, model: &mut dyn Module) -> Result<usize> {
    let file = File::open(path.as_ref())?;
    let mut reader = BufReader::new(file);
    read_checkpoint(&mut reader, model)
}

// In-memory checkpoint (for testing and transfer)

/// Serialize a model's parameters to an in-memory byte vector.
pub fn to_bytes(model: &dyn Module) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_checkpoint(&mut buf, model)?;
    Ok(buf)
}

/// Deserialize parameters from an in-memory byte slice into a model.
pub fn from_bytes(data: &[u8], model: &mut dyn Module) -> Result<usize> {
    let mut cursor = std::io::Cursor::new(data);
    read_checkpoint(&mut cursor, model)
}

// Persist — method-call sugar over save/load

/// Save and load as methods on any [`Module`].
pub trait Persist {
    /// Write this model's parameters to `path`.
    fn save(&self, path: impl AsRef<Path>) -> Result<()>;

    /// Overwrite this model's parameters from `path`. Returns the number of
    /// parameters loaded.
    fn load(&mut self, path: impl AsRef<Path>) -> Result<usize>;
}

impl<M: Module> Persist for M {
    fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        save(path, self)
    }

    fn load(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        load(path, self)
    }
}

// Tests
