//! Legacy VTK ASCII `POLYDATA` codec.
//!
//! The dialect is fixed: four header lines, then `POINTS`, `LINES` and
//! `POLYGONS` sections in that order.
//!
//! ```text
//! # vtk DataFile Version 3.0
//! vtk output
//! ASCII
//! DATASET POLYDATA
//! POINTS <N> float
//! x y z                      (N lines)
//! LINES <E> <3E>
//! 2 origin end               (E lines, one per undirected edge)
//! POLYGONS <F> <4F>
//! 3 v0 v1 v2                 (F lines)
//! ```
//!
//! Lines may end in `\n` or `\r\n`. On read, every `LINES` record becomes a
//! twin pair of half-edges and the polygons are matched against those pairs;
//! see [`build_from_edges_and_triangles`].

use std::fmt;

use log::debug;
use nalgebra::Point3;

use crate::error::{MeshError, Result};
use crate::mesh::{
    build_from_edges_and_triangles, to_edge_list, to_face_vertex, HalfEdgeMesh, MeshIndex,
};

/// First header line.
pub const MAGIC: &str = "# vtk DataFile Version 3.0";
/// Second header line (dataset name).
pub const TITLE: &str = "vtk output";
/// Third header line (encoding).
pub const ENCODING: &str = "ASCII";
/// Fourth header line (dataset type).
pub const DATASET: &str = "DATASET POLYDATA";

/// Raw contents of a polydata file, before any connectivity is derived.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VtkPolyData {
    /// Vertex positions in index order.
    pub points: Vec<Point3<f64>>,
    /// Undirected edges as `[origin, end]`.
    pub lines: Vec<[usize; 2]>,
    /// Triangles as vertex-index triples.
    pub polygons: Vec<[usize; 3]>,
}

impl VtkPolyData {
    /// Flatten a mesh: vertices in index order, each undirected edge once,
    /// each face in traversal order.
    pub fn from_mesh<I: MeshIndex>(mesh: &HalfEdgeMesh<I>) -> Self {
        let (points, polygons) = to_face_vertex(mesh);
        Self {
            points,
            lines: to_edge_list(mesh),
            polygons,
        }
    }

    /// Rebuild half-edge connectivity from the raw lists.
    pub fn to_mesh<I: MeshIndex>(&self) -> Result<HalfEdgeMesh<I>> {
        build_from_edges_and_triangles(&self.points, &self.lines, &self.polygons)
    }
}

impl fmt::Display for VtkPolyData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", MAGIC)?;
        writeln!(f, "{}", TITLE)?;
        writeln!(f, "{}", ENCODING)?;
        writeln!(f, "{}", DATASET)?;

        // `{}` on f64 is the shortest text that parses back to the same bits.
        writeln!(f, "POINTS {} float", self.points.len())?;
        for p in &self.points {
            writeln!(f, "{} {} {}", p.x, p.y, p.z)?;
        }

        writeln!(f, "LINES {} {}", self.lines.len(), self.lines.len() * 3)?;
        for [o, e] in &self.lines {
            writeln!(f, "2 {} {}", o, e)?;
        }

        writeln!(f, "POLYGONS {} {}", self.polygons.len(), self.polygons.len() * 4)?;
        for [a, b, c] in &self.polygons {
            writeln!(f, "3 {} {} {}", a, b, c)?;
        }
        Ok(())
    }
}

/// Parse polydata text into raw lists without building connectivity.
///
/// # Errors
/// [`MeshError::Format`] for a header mismatch, a missing or misordered
/// section keyword, a malformed count or number, or trailing content.
pub fn parse(text: &str) -> Result<VtkPolyData> {
    let mut reader = LineReader::new(text);

    for expected in [MAGIC, TITLE, ENCODING, DATASET] {
        reader.expect_exact(expected)?;
    }

    let [count, data_type] = reader.section_header("POINTS")?;
    let num_points = reader.parse_count(count)?;
    if data_type != "float" && data_type != "double" {
        return Err(reader.error(format!("unsupported POINTS data type {:?}", data_type)));
    }
    let mut points = Vec::with_capacity(reader.reserve_for(num_points));
    for _ in 0..num_points {
        points.push(reader.point()?);
    }

    let lines = reader.index_section::<2>("LINES")?;
    let polygons = reader.index_section::<3>("POLYGONS")?;

    reader.expect_end()?;

    debug!(
        "parsed polydata: {} points, {} lines, {} polygons",
        points.len(),
        lines.len(),
        polygons.len()
    );
    Ok(VtkPolyData {
        points,
        lines,
        polygons,
    })
}

/// Parse polydata text and build a half-edge mesh from it.
///
/// # Example
/// ```
/// use hedron::io::vtk;
/// use hedron::mesh::{octahedron, HalfEdgeMesh};
///
/// let text = vtk::write(&octahedron::<u32>()).unwrap();
/// let mesh: HalfEdgeMesh = vtk::read(&text).unwrap();
/// assert_eq!(mesh.num_faces(), 8);
/// ```
pub fn read<I: MeshIndex>(text: &str) -> Result<HalfEdgeMesh<I>> {
    parse(text)?.to_mesh()
}

/// Serialize a mesh to polydata text.
///
/// # Errors
/// [`MeshError::EmptyMesh`] if the mesh is empty.
pub fn write<I: MeshIndex>(mesh: &HalfEdgeMesh<I>) -> Result<String> {
    if mesh.is_empty() {
        return Err(MeshError::EmptyMesh);
    }
    Ok(VtkPolyData::from_mesh(mesh).to_string())
}

/// Line cursor that tracks 1-based line numbers for error messages.
struct LineReader<'a> {
    lines: std::str::Lines<'a>,
    line_no: usize,
}

impl<'a> LineReader<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines(),
            line_no: 0,
        }
    }

    fn error(&self, message: impl Into<String>) -> MeshError {
        MeshError::format(self.line_no, message)
    }

    fn next_line(&mut self, expected: &str) -> Result<&'a str> {
        self.line_no += 1;
        match self.lines.next() {
            Some(line) => Ok(line),
            None => Err(self.error(format!("unexpected end of input, expected {}", expected))),
        }
    }

    fn expect_exact(&mut self, expected: &str) -> Result<()> {
        let line = self.next_line(expected)?;
        if line != expected {
            return Err(self.error(format!("expected {:?}, found {:?}", expected, line)));
        }
        Ok(())
    }

    /// Read `<keyword> <a> <b>` and return `[a, b]`.
    fn section_header(&mut self, keyword: &str) -> Result<[&'a str; 2]> {
        let line = self.next_line(keyword)?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens.as_slice() {
            [k, a, b] if *k == keyword => Ok([*a, *b]),
            [k, ..] if *k == keyword => Err(self.error(format!("malformed {} header", keyword))),
            _ => Err(self.error(format!("expected {} section, found {:?}", keyword, line))),
        }
    }

    /// Declared counts are untrusted; never reserve past the lines left.
    fn reserve_for(&self, declared: usize) -> usize {
        declared.min(self.lines.clone().count())
    }

    fn parse_count(&self, token: &str) -> Result<usize> {
        token
            .parse()
            .map_err(|_| self.error(format!("invalid count {:?}", token)))
    }

    fn point(&mut self) -> Result<Point3<f64>> {
        let line = self.next_line("point coordinates")?;
        let mut coords = [0.0; 3];
        let mut tokens = line.split_whitespace();
        for c in &mut coords {
            let token = tokens
                .next()
                .ok_or_else(|| self.error("expected three coordinates"))?;
            *c = token
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| self.error(format!("invalid coordinate {:?}", token)))?;
        }
        if tokens.next().is_some() {
            return Err(self.error("expected three coordinates"));
        }
        Ok(Point3::new(coords[0], coords[1], coords[2]))
    }

    /// Read `<keyword> <count> <size>` followed by `count` records of the
    /// form `N i0 .. iN-1`, where `size` must equal `count * (N + 1)`.
    fn index_section<const N: usize>(&mut self, keyword: &str) -> Result<Vec<[usize; N]>> {
        let [count, size] = self.section_header(keyword)?;
        let count = self.parse_count(count)?;
        let size = self.parse_count(size)?;
        if count.checked_mul(N + 1) != Some(size) {
            return Err(self.error(format!(
                "{} size {} does not match {} records of {} values",
                keyword,
                size,
                count,
                N + 1
            )));
        }

        let mut records = Vec::with_capacity(self.reserve_for(count));
        for _ in 0..count {
            let line = self.next_line(keyword)?;
            let values = line
                .split_whitespace()
                .map(|t| t.parse::<usize>())
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|_| self.error(format!("invalid {} record {:?}", keyword, line)))?;
            match values.split_first() {
                Some((&n, rest)) if n == N && rest.len() == N => {
                    let mut record = [0; N];
                    record.copy_from_slice(rest);
                    records.push(record);
                }
                _ => {
                    return Err(self.error(format!(
                        "expected {} record with {} indices, found {:?}",
                        keyword, N, line
                    )))
                }
            }
        }
        Ok(records)
    }

    fn expect_end(&mut self) -> Result<()> {
        for line in self.lines.by_ref() {
            self.line_no += 1;
            if !line.trim().is_empty() {
                return Err(MeshError::format(
                    self.line_no,
                    format!("unexpected content after POLYGONS: {:?}", line),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::subdivide::subdivide;
    use crate::mesh::octahedron;

    const OCTAHEDRON_VTK: &str = "\
# vtk DataFile Version 3.0
vtk output
ASCII
DATASET POLYDATA
POINTS 6 float
0 0 1
-1 0 0
0 -1 0
1 0 0
0 1 0
0 0 -1
LINES 12 36
2 1 2
2 0 1
2 2 3
2 0 2
2 3 4
2 0 3
2 0 4
2 1 5
2 2 5
2 3 5
2 1 4
2 4 5
POLYGONS 8 32
3 1 2 0
3 2 3 0
3 3 4 0
3 4 1 0
3 2 1 5
3 3 2 5
3 4 3 5
3 1 4 5
";

    fn format_line(err: MeshError) -> usize {
        match err {
            MeshError::Format { line, .. } => line,
            other => panic!("expected format error, got {:?}", other),
        }
    }

    #[test]
    fn test_write_octahedron() {
        let mesh: HalfEdgeMesh = octahedron();
        let text = write(&mesh).unwrap();
        assert_eq!(text, OCTAHEDRON_VTK);
    }

    #[test]
    fn test_read_octahedron() {
        let mesh: HalfEdgeMesh = read(OCTAHEDRON_VTK).unwrap();
        assert_eq!(mesh.num_vertices(), 6);
        assert_eq!(mesh.num_edges(), 12);
        assert_eq!(mesh.num_faces(), 8);
        assert!(mesh.is_valid());
        assert_eq!(to_face_vertex(&mesh), to_face_vertex(&octahedron::<u32>()));
    }

    #[test]
    fn test_read_crlf() {
        let text = OCTAHEDRON_VTK.replace('\n', "\r\n");
        let mesh: HalfEdgeMesh = read(&text).unwrap();
        assert_eq!(mesh.num_faces(), 8);
    }

    #[test]
    fn test_point_tolerates_trailing_space() {
        let text = OCTAHEDRON_VTK.replace("0 0 1\n", "0 0 1 \n");
        assert_eq!(parse(&text).unwrap().points[0], Point3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_roundtrip_subdivided() {
        let mesh: HalfEdgeMesh = subdivide(&subdivide(&octahedron()).unwrap()).unwrap();
        let text = write(&mesh).unwrap();
        let back: HalfEdgeMesh = read(&text).unwrap();

        // Coordinates survive bit-exactly and in order.
        let (points_in, faces_in) = to_face_vertex(&mesh);
        let (points_out, faces_out) = to_face_vertex(&back);
        assert_eq!(points_in, points_out);
        assert_eq!(faces_in, faces_out);

        let data = parse(&text).unwrap();
        assert_eq!(data.lines.len(), mesh.num_edges());
        assert_eq!(data.polygons.len(), mesh.num_faces());
    }

    #[test]
    fn test_bad_magic() {
        let text = OCTAHEDRON_VTK.replacen("# vtk DataFile Version 3.0", "# vtk DataFile Version 2.0", 1);
        assert_eq!(format_line(parse(&text).unwrap_err()), 1);
    }

    #[test]
    fn test_each_header_line_is_checked() {
        for (line, bad) in [(2, "vtk input"), (3, "BINARY"), (4, "DATASET UNSTRUCTURED_GRID")] {
            let mut lines: Vec<&str> = OCTAHEDRON_VTK.lines().collect();
            lines[line - 1] = bad;
            let text = lines.join("\n");
            assert_eq!(format_line(parse(&text).unwrap_err()), line);
        }
    }

    #[test]
    fn test_header_rejects_extra_whitespace() {
        let text = OCTAHEDRON_VTK.replacen("ASCII", "ASCII ", 1);
        assert_eq!(format_line(parse(&text).unwrap_err()), 3);
    }

    #[test]
    fn test_misordered_section() {
        let text = OCTAHEDRON_VTK.replacen("LINES 12 36", "POLYGONS 12 36", 1);
        let err = parse(&text).unwrap_err();
        assert!(err.to_string().contains("expected LINES"));
        assert_eq!(format_line(err), 12);
    }

    #[test]
    fn test_missing_section() {
        let text: String = OCTAHEDRON_VTK.lines().take(11).collect::<Vec<_>>().join("\n");
        let err = parse(&text).unwrap_err();
        assert!(err.to_string().contains("unexpected end of input"));
    }

    #[test]
    fn test_bad_numbers() {
        let text = OCTAHEDRON_VTK.replacen("-1 0 0", "-1 zero 0", 1);
        assert_eq!(format_line(parse(&text).unwrap_err()), 7);

        let text = OCTAHEDRON_VTK.replacen("-1 0 0", "-1 NaN 0", 1);
        assert_eq!(format_line(parse(&text).unwrap_err()), 7);

        let text = OCTAHEDRON_VTK.replacen("POINTS 6 float", "POINTS six float", 1);
        assert_eq!(format_line(parse(&text).unwrap_err()), 5);

        let text = OCTAHEDRON_VTK.replacen("POINTS 6 float", "POINTS 6 int", 1);
        assert_eq!(format_line(parse(&text).unwrap_err()), 5);
    }

    #[test]
    fn test_bad_records() {
        let text = OCTAHEDRON_VTK.replacen("LINES 12 36", "LINES 12 24", 1);
        assert_eq!(format_line(parse(&text).unwrap_err()), 12);

        let text = OCTAHEDRON_VTK.replacen("2 1 2\n", "3 1 2\n", 1);
        assert_eq!(format_line(parse(&text).unwrap_err()), 13);

        let text = OCTAHEDRON_VTK.replacen("3 1 2 0\n", "3 1 2\n", 1);
        assert_eq!(format_line(parse(&text).unwrap_err()), 26);
    }

    #[test]
    fn test_trailing_content() {
        let text = format!("{}\n\n", OCTAHEDRON_VTK);
        assert!(parse(&text).is_ok());

        let text = format!("{}POINT_DATA 6\n", OCTAHEDRON_VTK);
        assert_eq!(format_line(parse(&text).unwrap_err()), 34);
    }

    #[test]
    fn test_unlisted_edge_is_incomplete_topology() {
        let text = OCTAHEDRON_VTK
            .replacen("LINES 12 36", "LINES 11 33", 1)
            .replacen("2 4 5\n", "", 1);
        let result: Result<HalfEdgeMesh> = read(&text);
        assert!(matches!(result, Err(MeshError::IncompleteTopology { .. })));
    }

    #[test]
    fn test_inconsistent_winding_is_accepted() {
        let text = OCTAHEDRON_VTK.replacen("3 1 4 5\n", "3 4 1 5\n", 1);
        let mesh: HalfEdgeMesh = read(&text).unwrap();
        assert!(mesh.is_valid());
        assert_eq!(mesh.euler_characteristic(), 2);
    }

    #[test]
    fn test_huge_declared_counts() {
        let header = [MAGIC, TITLE, ENCODING, DATASET].join("\n");

        let text = format!("{}\nPOINTS 18446744073709551615 float\n0 0 1\n", header);
        let err = parse(&text).unwrap_err();
        assert!(err.to_string().contains("unexpected end of input"));
        assert_eq!(format_line(err), 7);

        let text = format!("{}\nPOINTS 100000000000 float\n0 0 1\n", header);
        assert_eq!(format_line(parse(&text).unwrap_err()), 7);

        let text = format!(
            "{}\nPOINTS 3 float\n0 0 1\n1 0 0\n0 1 0\nLINES 6148914691236517205 18446744073709551615\n2 0 1\n",
            header
        );
        assert_eq!(format_line(parse(&text).unwrap_err()), 11);
    }

    #[test]
    fn test_write_empty_mesh() {
        let mesh = HalfEdgeMesh::<u32>::new();
        assert!(matches!(write(&mesh), Err(MeshError::EmptyMesh)));
    }

    #[test]
    fn test_failed_read_leaves_mesh_alone() {
        let mut current: HalfEdgeMesh = octahedron();
        let snapshot = current.clone();
        match read::<u32>("not a vtk file") {
            Ok(mesh) => current = mesh,
            Err(err) => assert_eq!(format_line(err), 1),
        }
        assert_eq!(current, snapshot);
    }
}
