use image::{ImageBuffer, Pixel};
use log::debug;

use crate::bit_packer::{from_bits, BitIterator};
use crate::media::placement::PlacementMap;
use crate::result::Result;

/// writes the bits of `payload` along `map` into `carrier`, returns the number of bits written.
///
/// The map is validated before the first pixel is touched, so a failure leaves the carrier as it was.
/// Payload bits without a slot are dropped.
pub fn hide<P>(
    carrier: &mut ImageBuffer<P, Vec<u8>>,
    map: &PlacementMap,
    payload: &[u8],
) -> Result<usize>
where
    P: Pixel<Subpixel = u8>,
{
    let (width, height) = carrier.dimensions();
    map.validate(width, height, P::CHANNEL_COUNT)?;

    let mut written = 0;
    for (slot, bit) in map.iter().zip(BitIterator::new(payload)) {
        for target in slot.targets() {
            let pixel = carrier.get_pixel_mut(target.x, target.y);
            let channel = &mut pixel.channels_mut()[target.channel.index()];
            *channel = target.hide_bit(*channel, bit);
        }
        written += 1;
    }
    debug!(
        "hid {written} of {} payload bits in a {width}x{height} carrier",
        payload.len() * 8
    );

    Ok(written)
}

/// reads one bit per slot from the primary target and packs them into bytes
pub fn unveil<P>(carrier: &ImageBuffer<P, Vec<u8>>, map: &PlacementMap) -> Result<Vec<u8>>
where
    P: Pixel<Subpixel = u8>,
{
    let (width, height) = carrier.dimensions();
    map.validate(width, height, P::CHANNEL_COUNT)?;

    Ok(from_bits(map.iter().map(|slot| {
        let target = slot.primary;
        let pixel = carrier.get_pixel(target.x, target.y);
        target.unveil_bit(pixel.channels()[target.channel.index()])
    })))
}
