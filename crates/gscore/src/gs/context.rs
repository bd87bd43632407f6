use super::registers::{
    AlphaBlend, Clamp, FogColor, FrameBufferSettings, PixelTest, Register, Scissor, Texture,
    TextureAlpha, TextureMipMap, XyOffset, ZBufferSettings,
};
use super::Gs;
use crate::bits::Bits;

/// Snapshot of the register state one primitive draws with, resolved at
/// kick completion for the context the latched primitive mode selects.
/// Valid until the next resolution overwrites it.
#[derive(Debug, Clone, Default)]
pub struct ResolvedContext {
    pub frame: FrameBufferSettings,
    pub z_buffer: ZBufferSettings,
    pub offset: XyOffset,
    pub texture: Texture,
    pub texture_mip_map: TextureMipMap,
    pub texture_width: u16,
    pub texture_height: u16,
    pub clamp: Clamp,
    pub alpha_blend: AlphaBlend,
    pub scissor: Scissor,
    pub pixel_test: PixelTest,
    pub texture_alpha: TextureAlpha,
    pub fog_color: FogColor,
    pub scan_mask: u8,
    pub color_clamp: bool,
    pub alpha_correction: bool,
}

impl Gs {
    /// Pure function of the register file and the context selector; the
    /// only effect of calling it is the returned snapshot.
    pub fn resolve_context(&self, context: usize) -> ResolvedContext {
        let pair = |first: Register, second: Register| {
            self.registers[if context == 0 { first } else { second }]
        };

        let texture = Texture::from(pair(Register::Texture1, Register::Texture2));
        ResolvedContext {
            frame: FrameBufferSettings::from(pair(Register::FrameBuffer1, Register::FrameBuffer2)),
            z_buffer: ZBufferSettings::from(pair(Register::ZBuffer1, Register::ZBuffer2)),
            offset: XyOffset::from(pair(Register::XyOffset1, Register::XyOffset2)),
            texture_width: texture.width,
            texture_height: texture.height,
            texture,
            texture_mip_map: TextureMipMap::from(pair(
                Register::TextureMipMap1,
                Register::TextureMipMap2,
            )),
            clamp: Clamp::from(pair(Register::Clamp1, Register::Clamp2)),
            alpha_blend: AlphaBlend::from(pair(Register::Alpha1, Register::Alpha2)),
            scissor: Scissor::from(pair(Register::Scissor1, Register::Scissor2)),
            pixel_test: PixelTest::from(pair(Register::PixelTest1, Register::PixelTest2)),
            texture_alpha: TextureAlpha::from(self.registers[Register::TextureAlpha]),
            fog_color: FogColor::from(self.registers[Register::FogColor]),
            scan_mask: self.registers[Register::ScanMask].bits(0..=1) as u8,
            color_clamp: self.registers[Register::ColorClamp].bit(0),
            alpha_correction: pair(Register::FrameBufferAlpha1, Register::FrameBufferAlpha2)
                .bit(0),
        }
    }
}
