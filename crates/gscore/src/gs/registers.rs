use derive_more::Display;
use enum_map::Enum;
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use crate::bits::Bits;
use crate::fix::Fix124;

#[repr(u8)]
#[derive(FromPrimitive, Debug, Clone, Copy, PartialEq, Eq, Enum)]
pub enum Register {
    Primitive = 0x00,              // PRIM Drawing primitive setting
    Rgbaq = 0x01,                  // RGBAQ Vertex color setting
    St = 0x02,                     // ST Vertex texture coordinate setting (texture coordinates)
    Uv = 0x03,                     // UV Vertex texture coordinate setting (texel coordinates)
    Xyzf2 = 0x04,                  // XYZF2 Vertex coordinate value setting
    Xyz2 = 0x05,                   // XYZ2 Vertex coordinate value setting
    Texture1 = 0x06,               // TEX0_1 Texture information setting
    Texture2 = 0x07,               // TEX0_2 Texture information setting
    Clamp1 = 0x08,                 // CLAMP_1 Texture wrap mode
    Clamp2 = 0x09,                 // CLAMP_2 Texture wrap mode
    Fog = 0x0a,                    // FOG Vertex fog value setting
    Xyzf3 = 0x0c,                  // XYZF3 Vertex coordinate value setting (without drawing kick)
    Xyz3 = 0x0d,                   // XYZ3 Vertex coordinate value setting (without drawing kick)
    TextureMipMap1 = 0x14,         // TEX1_1 Texture information setting
    TextureMipMap2 = 0x15,         // TEX1_2 Texture information setting
    TextureClut1 = 0x16,           // TEX2_1 Texture information setting
    TextureClut2 = 0x17,           // TEX2_2 Texture information setting
    XyOffset1 = 0x18,              // XYOFFSET_1 Offset value setting
    XyOffset2 = 0x19,              // XYOFFSET_2 Offset value setting
    PrimitiveModeControl = 0x1a,   // PRMODECONT Specification of primitive attribute setting method
    PrimitiveMode = 0x1b,          // PRMODE Drawing primitive attribute setting
    TexClut = 0x1c,                // TEXCLUT CLUT position setting
    ScanMask = 0x22,               // SCANMSK Raster address mask setting
    MipMap1_1 = 0x34,              // MIPTBP1_1 MIPMAP information setting (Level 1 - 3)
    MipMap1_2 = 0x35,              // MIPTBP1_2 MIPMAP information setting (Level 1 - 3)
    MipMap2_1 = 0x36,              // MIPTBP2_1 MIPMAP information setting (Level 4 - 6)
    MipMap2_2 = 0x37,              // MIPTBP2_2 MIPMAP information setting (Level 4 - 6)
    TextureAlpha = 0x3b,           // TEXA Texture alpha value setting
    FogColor = 0x3d,               // FOGCOL Distant fog color setting
    TextureFlush = 0x3f,           // TEXFLUSH Texture page buffer disabling
    Scissor1 = 0x40,               // SCISSOR_1 Scissoring area setting
    Scissor2 = 0x41,               // SCISSOR_2 Scissoring area setting
    Alpha1 = 0x42,                 // ALPHA_1 Alpha blending setting
    Alpha2 = 0x43,                 // ALPHA_2 Alpha blending setting
    DitherMatrix = 0x44,           // DIMX Dither matrix setting
    DitherControl = 0x45,          // DTHE Dither control
    ColorClamp = 0x46,             // COLCLAMP Color clamp control
    PixelTest1 = 0x47,             // TEST_1 Pixel test control
    PixelTest2 = 0x48,             // TEST_2 Pixel test control
    PixelAlphaBlending = 0x49,     // PABE Alpha blending control in pixel units
    FrameBufferAlpha1 = 0x4a,      // FBA_1 Alpha correction value
    FrameBufferAlpha2 = 0x4b,      // FBA_2 Alpha correction value
    FrameBuffer1 = 0x4c,           // FRAME_1 Frame buffer setting
    FrameBuffer2 = 0x4d,           // FRAME_2 Frame buffer setting
    ZBuffer1 = 0x4e,               // ZBUF_1 Z buffer setting
    ZBuffer2 = 0x4f,               // ZBUF_2 Z buffer setting
    BitBlitBuffer = 0x50,          // BITBLTBUF Setting for transmission between buffers
    TransmissionPosition = 0x51,   // TRXPOS Specification for transmission area in buffers
    TransmissionSize = 0x52,       // TRXREG Specification for transmission area in buffers
    TransmissionActivation = 0x53, // TRXDIR Activation of transmission between buffers
    TransmissionData = 0x54,       // HWREG Data port for transmission between buffers
    SignalSignal = 0x60,           // SIGNAL SIGNAL event occurrence request
    SignalFinish = 0x61,           // FINISH FINISH event occurrence request
    SignalLabel = 0x62,            // LABEL LABEL event occurrence request
}

#[derive(FromPrimitive, Display, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PixelStorageFormat {
    #[default]
    Psmct32 = 0b000000,
    Psmct24 = 0b000001,
    Psmct16 = 0b000010,
    Psmct16s = 0b001010,
    Psgpu24 = 0b010010,
    Psmt8 = 0b010011,
    Psmt4 = 0b010100,
    Psmt8h = 0b011011,
    Psmt4hl = 0b100100,
    Psmt4hh = 0b101100,
    Psmz32 = 0b110000,
    Psmz24 = 0b110001,
    Psmz16 = 0b110010,
    Psmz16s = 0b111010,
}

/// FRAME_1 / FRAME_2. Base pointer and width are stored in bytes and
/// pixels respectively.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameBufferSettings {
    pub base_pointer: u32,
    pub width: u16,
    pub pixel_storage_format: PixelStorageFormat,
    pub drawing_mask: u32,
}

impl From<u64> for FrameBufferSettings {
    fn from(raw: u64) -> Self {
        FrameBufferSettings {
            base_pointer: raw.bits(0..=8) as u32 * 8192,
            width: raw.bits(16..=21) as u16 * 64,
            pixel_storage_format: PixelStorageFormat::from_u64(raw.bits(24..=29))
                .unwrap_or_else(|| panic!("Invalid pixel storage format {:b}", raw.bits(24..=29))),
            drawing_mask: raw.bits(32..64) as u32,
        }
    }
}

/// ZBUF_1 / ZBUF_2. The stored format field is the low nibble of the
/// depth format; or it with 0x30 to get the `PixelStorageFormat` encoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZBufferSettings {
    pub base_pointer: u32,
    pub pixel_storage_format: u8,
    pub update_mask: bool,
}

impl From<u64> for ZBufferSettings {
    fn from(raw: u64) -> Self {
        ZBufferSettings {
            base_pointer: raw.bits(0..=8) as u32 * 8192,
            pixel_storage_format: raw.bits(24..=27) as u8,
            update_mask: raw.bit(32),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct XyOffset {
    pub x: Fix124,
    pub y: Fix124,
}

impl From<u64> for XyOffset {
    fn from(raw: u64) -> Self {
        XyOffset {
            x: Fix124::from_raw(raw.bits(0..16) as u16),
            y: Fix124::from_raw(raw.bits(32..48) as u16),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Scissor {
    pub x0: u16,
    pub x1: u16,
    pub y0: u16,
    pub y1: u16,
}

impl Scissor {
    pub fn contains(&self, x: u16, y: u16) -> bool {
        (self.x0..=self.x1).contains(&x) && (self.y0..=self.y1).contains(&y)
    }
}

impl From<u64> for Scissor {
    fn from(raw: u64) -> Self {
        Scissor {
            x0: raw.bits(0..=10) as u16,
            x1: raw.bits(16..=26) as u16,
            y0: raw.bits(32..=42) as u16,
            y1: raw.bits(48..=58) as u16,
        }
    }
}

#[derive(FromPrimitive, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PrimitiveType {
    #[default]
    Point,
    Line,
    LineStrip,
    Triangle,
    TriangleStrip,
    TriangleFan,
    Sprite,
    SpecificationProhibited,
}

impl PrimitiveType {
    /// Vertices buffered before the primitive completes.
    pub fn vertex_quota(self) -> u32 {
        match self {
            PrimitiveType::Point => 1,
            PrimitiveType::Line | PrimitiveType::LineStrip => 2,
            PrimitiveType::Triangle
            | PrimitiveType::TriangleStrip
            | PrimitiveType::TriangleFan => 3,
            PrimitiveType::Sprite => 2,
            PrimitiveType::SpecificationProhibited => 0,
        }
    }
}

/// Attribute bits shared by PRIM and PRMODE (bits 3..=10 of either
/// register), plus the context select used to resolve the rendering
/// context.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrimitiveMode {
    pub shading_method: ShadingMethod,                      // IIP
    pub texture_mapping: bool,                              // TME
    pub fogging: bool,                                      // FGE
    pub alpha_blending: bool,                               // ABE
    pub anti_aliasing: bool,                                // AA1
    pub texture_coordinate_method: TextureCoordinateMethod, // FST
    pub context: Context,                                   // CTXT
    pub fragment_value_control: FragmentValueControl,       // FIX
}

impl From<u64> for PrimitiveMode {
    fn from(raw: u64) -> Self {
        PrimitiveMode {
            shading_method: match raw.bit(3) {
                false => ShadingMethod::Flat,
                true => ShadingMethod::Gouraud,
            },
            texture_mapping: raw.bit(4),
            fogging: raw.bit(5),
            alpha_blending: raw.bit(6),
            anti_aliasing: raw.bit(7),
            texture_coordinate_method: match raw.bit(8) {
                false => TextureCoordinateMethod::Stq,
                true => TextureCoordinateMethod::Uv,
            },
            context: match raw.bit(9) {
                false => Context::Context1,
                true => Context::Context2,
            },
            fragment_value_control: match raw.bit(10) {
                false => FragmentValueControl::Unfixed,
                true => FragmentValueControl::Fixed,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ShadingMethod {
    #[default]
    Flat,
    Gouraud,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextureCoordinateMethod {
    #[default]
    Stq,
    Uv,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Context {
    #[default]
    Context1,
    Context2,
}

impl Context {
    pub fn index(self) -> usize {
        match self {
            Context::Context1 => 0,
            Context::Context2 => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FragmentValueControl {
    #[default]
    Unfixed,
    Fixed,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Rgbaq {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
    pub q: f32,
}

impl From<u64> for Rgbaq {
    fn from(raw: u64) -> Self {
        Rgbaq {
            r: raw.bits(0..8) as u8,
            g: raw.bits(8..16) as u8,
            b: raw.bits(16..24) as u8,
            a: raw.bits(24..32) as u8,
            q: f32::from_bits(raw.bits(32..64) as u32),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Xyz {
    pub x: Fix124,
    pub y: Fix124,
    pub z: u32,
}

impl From<u64> for Xyz {
    fn from(raw: u64) -> Self {
        Xyz {
            x: Fix124::from_raw(raw.bits(0..16) as u16),
            y: Fix124::from_raw(raw.bits(16..32) as u16),
            z: raw.bits(32..64) as u32,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Uv {
    pub u: Fix124,
    pub v: Fix124,
}

impl From<u64> for Uv {
    fn from(raw: u64) -> Self {
        Uv {
            u: Fix124::from_raw(raw.bits(0..=13) as u16),
            v: Fix124::from_raw(raw.bits(16..=29) as u16),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct St {
    pub s: f32,
    pub t: f32,
}

impl From<u64> for St {
    fn from(raw: u64) -> Self {
        St {
            s: f32::from_bits(raw.bits(0..32) as u32),
            t: f32::from_bits(raw.bits(32..64) as u32),
        }
    }
}

/// TEX0_1 / TEX0_2. Base pointers are stored in bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Texture {
    pub base_pointer: u32,                               // TBP0
    pub buffer_width: u16,                               // TBW
    pub pixel_storage_format: PixelStorageFormat,        // PSM
    pub width: u16,                                      // TW
    pub height: u16,                                     // TH
    pub has_alpha: bool,                                 // TCC
    pub function: TextureFunction,                       // TFX
    pub clut_buffer_base_pointer: u32,                   // CBP
    pub clut_pixel_storage_format: PixelStorageFormat,   // CPSM
    pub clut_storage_mode: ClutStorageMode,              // CSM
    pub clut_entry_offset: u16,                          // CSA
    pub clut_buffer_load_control: ClutBufferLoadControl, // CLD
}

impl From<u64> for Texture {
    fn from(raw: u64) -> Self {
        Texture {
            base_pointer: raw.bits(0..=13) as u32 * 256,
            buffer_width: raw.bits(14..=19) as u16 * 64,
            pixel_storage_format: PixelStorageFormat::from_u64(raw.bits(20..=25))
                .unwrap_or_else(|| panic!("Invalid pixel storage format {:b}", raw.bits(20..=25))),
            width: 2u16.pow(raw.bits(26..=29) as _),
            height: 2u16.pow(raw.bits(30..=33) as _),
            has_alpha: raw.bit(34),
            function: TextureFunction::from_u64(raw.bits(35..=36))
                .unwrap_or_else(|| panic!("Invalid texture function {:b}", raw.bits(35..=36))),
            clut_buffer_base_pointer: raw.bits(37..=50) as u32 * 256,
            clut_pixel_storage_format: PixelStorageFormat::from_u64(raw.bits(51..=54))
                .unwrap_or_else(|| panic!("Invalid pixel storage format {:b}", raw.bits(51..=54))),
            clut_storage_mode: ClutStorageMode::from_u64(raw.bits(55..=55))
                .unwrap_or_else(|| panic!("Invalid CLUT storage mode {:b}", raw.bits(55..=55))),
            clut_entry_offset: raw.bits(56..=60) as u16 * 16,
            clut_buffer_load_control: ClutBufferLoadControl::from_u64(raw.bits(61..=63))
                .unwrap_or_else(|| {
                    panic!("Invalid CLUT buffer load control {:b}", raw.bits(61..=63))
                }),
        }
    }
}

/// A TEX2 write replaces only the CLUT-related fields of the raw TEX0
/// register value; everything else keeps its current bits.
pub fn merge_clut_info(tex0: u64, tex2: u64) -> u64 {
    let mask = u64::mask(20..=25) | u64::mask(37..=63);
    (tex0 & !mask) | (tex2 & mask)
}

#[derive(FromPrimitive, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextureFunction {
    #[default]
    Modulate = 0b00,
    Decal = 0b01,
    Highlight = 0b10,
    Highlight2 = 0b11,
}

#[derive(FromPrimitive, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClutStorageMode {
    #[default]
    Csm1,
    Csm2,
}

#[derive(FromPrimitive, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClutBufferLoadControl {
    #[default]
    NotChanged = 0b000,
    LoadFromCsa = 0b001,
    LoadFromCsaCopyToCbp0 = 0b010,
    LoadFromCsaCopyToCbp1 = 0b011,
    LoadFromCbpCopyToCbp0 = 0b100,
    LoadFromCbpCopyToCbp1 = 0b101,
}

/// TEX1_1 / TEX1_2.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextureMipMap {
    pub fixed_lod: bool,      // LCM
    pub max_mip_level: u8,    // MXL
    pub magnify_linear: bool, // MMAG
    pub minify_filter: u8,    // MMIN
    pub base_from_tex0: bool, // MTBA
    pub lod_l: u8,            // L
    pub lod_k: u16,           // K (s7.4 fixed point, raw)
}

impl From<u64> for TextureMipMap {
    fn from(raw: u64) -> Self {
        TextureMipMap {
            fixed_lod: raw.bit(0),
            max_mip_level: raw.bits(2..=4) as u8,
            magnify_linear: raw.bit(5),
            minify_filter: raw.bits(6..=8) as u8,
            base_from_tex0: raw.bit(9),
            lod_l: raw.bits(19..=20) as u8,
            lod_k: raw.bits(32..=43) as u16,
        }
    }
}

#[derive(FromPrimitive, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WrapMode {
    #[default]
    Repeat = 0b00,
    Clamp = 0b01,
    RegionClamp = 0b10,
    RegionRepeat = 0b11,
}

/// CLAMP_1 / CLAMP_2.
#[derive(Debug, Clone, Copy, Default)]
pub struct Clamp {
    pub wrap_s: WrapMode, // WMS
    pub wrap_t: WrapMode, // WMT
    pub min_u: u16,       // MINU
    pub max_u: u16,       // MAXU
    pub min_v: u16,       // MINV
    pub max_v: u16,       // MAXV
}

impl From<u64> for Clamp {
    fn from(raw: u64) -> Self {
        Clamp {
            wrap_s: WrapMode::from_u64(raw.bits(0..=1))
                .unwrap_or_else(|| panic!("Invalid wrap mode {:b}", raw.bits(0..=1))),
            wrap_t: WrapMode::from_u64(raw.bits(2..=3))
                .unwrap_or_else(|| panic!("Invalid wrap mode {:b}", raw.bits(2..=3))),
            min_u: raw.bits(4..=13) as u16,
            max_u: raw.bits(14..=23) as u16,
            min_v: raw.bits(24..=33) as u16,
            max_v: raw.bits(34..=43) as u16,
        }
    }
}

/// ALPHA_1 / ALPHA_2. The a/b/c/d fields are the raw input selectors of
/// the blend equation (Cv = ((A - B) * C >> 7) + D).
#[derive(Debug, Clone, Copy, Default)]
pub struct AlphaBlend {
    pub a: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub fix: u8,
}

impl From<u64> for AlphaBlend {
    fn from(raw: u64) -> Self {
        AlphaBlend {
            a: raw.bits(0..=1) as u8,
            b: raw.bits(2..=3) as u8,
            c: raw.bits(4..=5) as u8,
            d: raw.bits(6..=7) as u8,
            fix: raw.bits(32..=39) as u8,
        }
    }
}

/// TEXA. Alpha expansion values for 16-bit and 24-bit texture formats.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextureAlpha {
    pub ta0: u8,
    pub expand_zero_alpha: bool, // AEM
    pub ta1: u8,
}

impl From<u64> for TextureAlpha {
    fn from(raw: u64) -> Self {
        TextureAlpha {
            ta0: raw.bits(0..=7) as u8,
            expand_zero_alpha: raw.bit(15),
            ta1: raw.bits(32..=39) as u8,
        }
    }
}

/// FOGCOL.
#[derive(Debug, Clone, Copy, Default)]
pub struct FogColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl From<u64> for FogColor {
    fn from(raw: u64) -> Self {
        FogColor {
            r: raw.bits(0..=7) as u8,
            g: raw.bits(8..=15) as u8,
            b: raw.bits(16..=23) as u8,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PixelTest {
    pub alpha_test: AlphaTest,        // ATE + ATST
    pub alpha_reference: u8,          // AREF
    pub alpha_fail: AlphaFail,        // AFAIL
    pub destination_alpha_test: bool, // DATE
    pub destination_alpha_mode: bool, // DATM
    pub depth_test: DepthTest,        // ZTE + ZTST
}

impl From<u64> for PixelTest {
    fn from(raw: u64) -> Self {
        PixelTest {
            alpha_test: match raw.bit(0) {
                false => AlphaTest::Always,
                true => AlphaTest::from_u64(raw.bits(1..=3))
                    .unwrap_or_else(|| panic!("Invalid alpha test {:b}", raw.bits(1..=3))),
            },
            alpha_reference: raw.bits(4..=11) as u8,
            alpha_fail: AlphaFail::from_u64(raw.bits(12..=13))
                .unwrap_or_else(|| panic!("Invalid alpha fail {:b}", raw.bits(12..=13))),
            destination_alpha_test: raw.bit(14),
            destination_alpha_mode: raw.bit(15),
            depth_test: match raw.bit(16) {
                false => DepthTest::Always, // ZTE=0 is not a legal encoding, but titles use it
                true => DepthTest::from_u64(raw.bits(17..=18))
                    .unwrap_or_else(|| panic!("Invalid depth test {:b}", raw.bits(17..=18))),
            },
        }
    }
}

#[derive(FromPrimitive, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AlphaTest {
    Never = 0b000,
    #[default]
    Always = 0b001, // Same as ATE=0
    Less = 0b010,
    LessOrEqual = 0b011,
    Equal = 0b100,
    GreaterOrEqual = 0b101,
    Greater = 0b110,
    NotEqual = 0b111,
}

#[derive(FromPrimitive, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AlphaFail {
    #[default]
    Keep = 0b00,
    FramebufferOnly = 0b01,
    DepthBufferOnly = 0b10,
    RgbOnly = 0b11,
}

#[derive(FromPrimitive, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DepthTest {
    #[default]
    Never = 0b00,
    Always = 0b01,
    GreaterOrEqual = 0b10,
    Greater = 0b11,
}

/// BITBLTBUF. Base pointers are stored in bytes, widths in pixels.
#[derive(Debug, Clone, Copy, Default)]
pub struct BitBlitBuffer {
    pub source_base_pointer: u32,
    pub source_width: u16,
    pub source_pixel_storage_format: PixelStorageFormat,
    pub destination_base_pointer: u32,
    pub destination_width: u16,
    pub destination_pixel_storage_format: PixelStorageFormat,
}

impl From<u64> for BitBlitBuffer {
    fn from(raw: u64) -> Self {
        BitBlitBuffer {
            source_base_pointer: raw.bits(0..=13) as u32 * 256,
            source_width: raw.bits(16..=21) as u16 * 64,
            source_pixel_storage_format: PixelStorageFormat::from_u64(raw.bits(24..=29))
                .unwrap_or_else(|| panic!("Invalid pixel storage format {:b}", raw.bits(24..=29))),
            destination_base_pointer: raw.bits(32..=45) as u32 * 256,
            destination_width: raw.bits(48..=53) as u16 * 64,
            destination_pixel_storage_format: PixelStorageFormat::from_u64(raw.bits(56..=61))
                .unwrap_or_else(|| panic!("Invalid pixel storage format {:b}", raw.bits(56..=61))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TransmissionPosition {
    pub source_x: u16,
    pub source_y: u16,
    pub destination_x: u16,
    pub destination_y: u16,
    pub order: PixelTransmissionOrder,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromPrimitive)]
pub enum PixelTransmissionOrder {
    #[default]
    UpperLeftToLowerRight,
    LowerLeftToUpperRight,
    UpperRightToLowerLeft,
    LowerRightToUpperLeft,
}

impl From<u64> for TransmissionPosition {
    fn from(raw: u64) -> Self {
        TransmissionPosition {
            source_x: raw.bits(0..=10) as u16,
            source_y: raw.bits(16..=26) as u16,
            destination_x: raw.bits(32..=42) as u16,
            destination_y: raw.bits(48..=58) as u16,
            order: PixelTransmissionOrder::from_u64(raw.bits(59..=60)).unwrap_or_else(|| {
                panic!("Invalid pixel transmission order {:b}", raw.bits(59..=60))
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TransmissionSize {
    pub width: u16,
    pub height: u16,
}

impl From<u64> for TransmissionSize {
    fn from(raw: u64) -> Self {
        TransmissionSize {
            width: raw.bits(0..=11) as u16,
            height: raw.bits(32..=43) as u16,
        }
    }
}

#[derive(FromPrimitive, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransmissionDirection {
    #[default]
    HostToLocal,
    LocalToHost,
    LocalToLocal,
    Deactivated,
}
