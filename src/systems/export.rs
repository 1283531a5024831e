// saves the landmass as an obj file
// scattered instances are written as comment records after the faces

use bevy::prelude::*;
use std::fs::File;
use std::io::{BufWriter, Write};

use crate::error::{Error, Result};
use crate::systems::landmass::pipeline::Generation;
use crate::systems::landmass::{GeneratedLandmass, LandmassParams};

// export event
#[derive(Event)]
pub struct ExportEvent {
    pub filename: String,
}

/// Write the landmass in world space, `frame` places the local mesh
pub fn write_obj<W: Write>(writer: &mut W, generation: &Generation, frame: &Transform) -> Result<()> {
    let mesh = &generation.mesh;
    if mesh.is_empty() {
        return Err(Error::EmptyMesh);
    }

    writeln!(writer, "# Exported from Landmass Generator")?;
    writeln!(writer, "o Landmass")?;

    for p in &mesh.positions {
        let p = frame.transform_point(*p);
        writeln!(writer, "v {} {} {}", p.x, p.y, p.z)?;
    }
    for uv in &mesh.uvs {
        writeln!(writer, "vt {} {}", uv.x, uv.y)?;
    }
    for n in &mesh.normals {
        let n = frame.rotation * *n;
        writeln!(writer, "vn {} {} {}", n.x, n.y, n.z)?;
    }

    // OBJ format indices start at 1
    for (group, indices) in [("cap", &mesh.cap), ("walls", &mesh.walls)] {
        writeln!(writer, "g {}", group)?;
        for tri in indices.chunks_exact(3) {
            let [a, b, c] = [tri[0] + 1, tri[1] + 1, tri[2] + 1];
            writeln!(writer, "f {a}/{a}/{a} {b}/{b}/{b} {c}/{c}/{c}")?;
        }
    }

    // category variant position rotation(xyzw) scale
    writeln!(writer, "# instances {}", generation.instances.len())?;
    for instance in &generation.instances {
        let p = instance.position;
        let q = instance.rotation;
        writeln!(
            writer,
            "# instance {} {} {} {} {} {} {} {} {} {}",
            instance.category, instance.variant,
            p.x, p.y, p.z,
            q.x, q.y, q.z, q.w,
            instance.scale
        )?;
    }

    Ok(())
}

pub fn export_obj(generation: &Generation, frame: &Transform, filename: &str) -> Result<()> {
    let file = File::create(filename)?;
    let mut writer = BufWriter::new(file);
    write_obj(&mut writer, generation, frame)?;
    writer.flush()?;
    Ok(())
}

// handle export events
pub fn handle_export(
    mut events: EventReader<ExportEvent>,
    landmass: Option<Res<GeneratedLandmass>>,
    params: Res<LandmassParams>,
) {
    for event in events.read() {
        let Some(landmass) = landmass.as_ref() else {
            warn!("export skipped: nothing generated yet");
            continue;
        };

        match export_obj(&landmass.0, &params.scatter.frame, &event.filename) {
            Ok(()) => {
                info!("Export successful: {}", event.filename);
            }
            Err(e) => {
                error!("Export failed: {}", e);
            }
        }
    }
}
