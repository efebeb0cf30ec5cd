use std::error::Error;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use grove_mesh::MeshBuffer;
use grove_terrain::SplatMap;
use image::RgbaImage;

/// Writes named buffers as objects in one Wavefront OBJ file (1-based, shared index space).
pub fn write_obj(path: &Path, objects: &[(&str, &MeshBuffer)]) -> io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    write_obj_to(&mut w, objects)?;
    w.flush()
}

pub fn write_obj_to<W: Write>(w: &mut W, objects: &[(&str, &MeshBuffer)]) -> io::Result<()> {
    let (mut v_base, mut vt_base, mut vn_base) = (1usize, 1usize, 1usize);
    for (name, mb) in objects {
        if mb.is_empty() {
            continue;
        }
        writeln!(w, "o {}", name)?;
        for p in mb.pos.chunks_exact(3) {
            writeln!(w, "v {} {} {}", p[0], p[1], p[2])?;
        }
        for t in mb.uv.chunks_exact(2) {
            writeln!(w, "vt {} {}", t[0], t[1])?;
        }
        for n in mb.norm.chunks_exact(3) {
            writeln!(w, "vn {} {} {}", n[0], n[1], n[2])?;
        }
        let (uv, nrm) = (mb.has_uvs(), mb.has_normals());
        for tri in mb.idx.chunks_exact(3) {
            write!(w, "f")?;
            for &i in tri {
                let i = i as usize;
                match (uv, nrm) {
                    (true, true) => write!(w, " {}/{}/{}", v_base + i, vt_base + i, vn_base + i)?,
                    (true, false) => write!(w, " {}/{}", v_base + i, vt_base + i)?,
                    (false, true) => write!(w, " {}//{}", v_base + i, vn_base + i)?,
                    (false, false) => write!(w, " {}", v_base + i)?,
                }
            }
            writeln!(w)?;
        }
        let n = mb.vertex_count();
        v_base += n;
        if uv {
            vt_base += n;
        }
        if nrm {
            vn_base += n;
        }
    }
    Ok(())
}

pub fn write_splat_png(path: &Path, splat: &SplatMap) -> Result<(), Box<dyn Error>> {
    let img = RgbaImage::from_raw(splat.resolution, splat.resolution, splat.data.clone())
        .ok_or("splat raster does not match its resolution")?;
    img.save(path)?;
    Ok(())
}
