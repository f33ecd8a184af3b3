//! Native GeoTIFF writing
//!
//! Uses the `tiff` crate. Grids are written as 32-bit float, north-up, with
//! missing cells encoded as NaN and declared through the `GDAL_NODATA` tag.

use crate::error::{Error, Result};
use crate::raster::Grid;
use std::fs::File;
use std::io::{BufWriter, Cursor};
use std::path::Path;
use tiff::encoder::colortype::Gray32Float;
use tiff::encoder::TiffEncoder;
use tiff::tags::Tag;

const MODEL_PIXEL_SCALE_TAG: u16 = 33550;
const MODEL_TIEPOINT_TAG: u16 = 33922;
const GEO_KEY_DIRECTORY_TAG: u16 = 34735;
const GDAL_NODATA_TAG: u16 = 42113;

fn to_u32(name: &'static str, value: usize) -> Result<u32> {
    u32::try_from(value).map_err(|_| Error::invalid_input(name, value, "too large for a TIFF image"))
}

/// Write a grid to a GeoTIFF file
pub fn write_geotiff<P: AsRef<Path>>(grid: &Grid, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    // TiffEncoder needs Seek, which BufWriter<File> provides
    encode_geotiff(grid, BufWriter::new(file))
}

/// Write a grid to an in-memory GeoTIFF buffer
pub fn write_geotiff_to_buffer(grid: &Grid) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    encode_geotiff(grid, Cursor::new(&mut buf))?;
    Ok(buf)
}

/// Internal: encode a grid as GeoTIFF into any `Write + Seek` sink
fn encode_geotiff<W>(grid: &Grid, writer: W) -> Result<()>
where
    W: std::io::Write + std::io::Seek,
{
    let (rows, cols) = grid.shape();
    let width = to_u32("width", cols)?;
    let height = to_u32("height", rows)?;

    let mut encoder = TiffEncoder::new(writer)?;
    let gt = grid.transform();
    let upward = gt.pixel_height > 0.0;

    // TIFF scanlines run top to bottom; upward grids are flipped
    let row_order: Box<dyn Iterator<Item = usize>> = if upward {
        Box::new((0..rows).rev())
    } else {
        Box::new(0..rows)
    };
    let data: Vec<f32> = row_order
        .flat_map(|row| {
            grid.data()
                .row(row)
                .iter()
                .map(|cell| cell.map_or(f32::NAN, |v| v as f32))
                .collect::<Vec<_>>()
        })
        .collect();

    let mut image = encoder.new_image::<Gray32Float>(width, height)?;

    let (min_x, _, _, max_y) = grid.bounds();

    let scale = [gt.pixel_width.abs(), gt.pixel_height.abs(), 0.0];
    image
        .encoder()
        .write_tag(Tag::Unknown(MODEL_PIXEL_SCALE_TAG), &scale[..])?;

    let tiepoint = [0.0, 0.0, 0.0, min_x, max_y, 0.0];
    image
        .encoder()
        .write_tag(Tag::Unknown(MODEL_TIEPOINT_TAG), &tiepoint[..])?;

    // Minimal GeoKey directory: GTModelTypeGeoKey = Projected,
    // GTRasterTypeGeoKey = RasterPixelIsArea
    let geokeys: [u16; 12] = [
        1, 1, 0, 2,
        1024, 0, 1, 1,
        1025, 0, 1, 1,
    ];
    image
        .encoder()
        .write_tag(Tag::Unknown(GEO_KEY_DIRECTORY_TAG), &geokeys[..])?;

    image
        .encoder()
        .write_tag(Tag::Unknown(GDAL_NODATA_TAG), "nan")?;

    image
        .write_data(&data)
        .map_err(|e| Error::Tiff(format!("Cannot write image data: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::GeoTransform;
    use std::io::Cursor;
    use tiff::decoder::{Decoder, DecodingResult};

    fn decode(buf: &[u8]) -> (u32, u32, Vec<f32>, Vec<f64>) {
        let mut decoder = Decoder::new(Cursor::new(buf)).unwrap();
        let (w, h) = decoder.dimensions().unwrap();
        let tiepoint = decoder
            .get_tag_f64_vec(Tag::from_u16_exhaustive(MODEL_TIEPOINT_TAG))
            .unwrap();
        let data = match decoder.read_image().unwrap() {
            DecodingResult::F32(buf) => buf,
            _ => panic!("expected f32 data"),
        };
        (w, h, data, tiepoint)
    }

    #[test]
    fn upward_grid_written_north_up() {
        let mut grid =
            Grid::from_vec(vec![Some(1.0), Some(2.0), None, Some(4.0)], 2, 2).unwrap();
        grid.set_transform(GeoTransform::new(0.0, 0.0, 10.0, 10.0));

        let buf = write_geotiff_to_buffer(&grid).unwrap();
        let (w, h, data, tiepoint) = decode(&buf);

        assert_eq!((w, h), (2, 2));
        // Top scanline is grid row 1
        assert!(data[0].is_nan());
        assert_eq!(data[1], 4.0);
        assert_eq!(data[2], 1.0);
        assert_eq!(data[3], 2.0);
        assert_eq!(tiepoint[3], 0.0);
        assert_eq!(tiepoint[4], 20.0);
    }

    #[test]
    fn dimensions_must_fit_tiff_header() {
        assert_eq!(to_u32("width", 5).unwrap(), 5);
        assert_eq!(to_u32("height", u32::MAX as usize).unwrap(), u32::MAX);
        #[cfg(target_pointer_width = "64")]
        assert!(matches!(
            to_u32("width", u32::MAX as usize + 1),
            Err(Error::InvalidInput { name: "width", .. })
        ));
    }

    #[test]
    fn write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.tif");
        let grid = Grid::from_values(vec![1.0, 2.0, 3.0], 1, 3).unwrap();

        write_geotiff(&grid, &path).unwrap();
        assert!(path.metadata().unwrap().len() > 0);
    }
}
