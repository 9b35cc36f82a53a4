//! Vulkan side of texture swap chains and mirror textures.
//!
//! The runtime describes textures with its own format and flag tables; these
//! helpers translate from what a Vulkan renderer already has at hand.

use anyhow::{bail, Result};
use ash::vk;

use crate::api::{Ovr, SessionHandle, TextureSwapChain};
use crate::ffi::{
    MirrorOptions, MirrorTextureDesc, OvrBool, TextureBindFlags, TextureFormat, TextureMiscFlags,
    TextureSwapChainDesc, TextureType,
};
use crate::result::OvrError;

const FORMATS: &[(TextureFormat, vk::Format)] = &[
    (TextureFormat::B5G6R5_UNORM, vk::Format::B5G6R5_UNORM_PACK16),
    (TextureFormat::B5G5R5A1_UNORM, vk::Format::B5G5R5A1_UNORM_PACK16),
    (TextureFormat::B4G4R4A4_UNORM, vk::Format::B4G4R4A4_UNORM_PACK16),
    (TextureFormat::R8G8B8A8_UNORM, vk::Format::R8G8B8A8_UNORM),
    (TextureFormat::R8G8B8A8_UNORM_SRGB, vk::Format::R8G8B8A8_SRGB),
    (TextureFormat::B8G8R8A8_UNORM, vk::Format::B8G8R8A8_UNORM),
    (TextureFormat::B8G8R8A8_UNORM_SRGB, vk::Format::B8G8R8A8_SRGB),
    (TextureFormat::B8G8R8_UNORM, vk::Format::B8G8R8_UNORM),
    (TextureFormat::R16G16B16A16_FLOAT, vk::Format::R16G16B16A16_SFLOAT),
    (TextureFormat::R11G11B10_FLOAT, vk::Format::B10G11R11_UFLOAT_PACK32),
    (TextureFormat::D16_UNORM, vk::Format::D16_UNORM),
    (TextureFormat::D24_UNORM_S8_UINT, vk::Format::D24_UNORM_S8_UINT),
    (TextureFormat::D32_FLOAT, vk::Format::D32_SFLOAT),
    (TextureFormat::D32_FLOAT_S8X24_UINT, vk::Format::D32_SFLOAT_S8_UINT),
    (TextureFormat::BC1_UNORM, vk::Format::BC1_RGBA_UNORM_BLOCK),
    (TextureFormat::BC1_UNORM_SRGB, vk::Format::BC1_RGBA_SRGB_BLOCK),
    (TextureFormat::BC2_UNORM, vk::Format::BC2_UNORM_BLOCK),
    (TextureFormat::BC2_UNORM_SRGB, vk::Format::BC2_SRGB_BLOCK),
    (TextureFormat::BC3_UNORM, vk::Format::BC3_UNORM_BLOCK),
    (TextureFormat::BC3_UNORM_SRGB, vk::Format::BC3_SRGB_BLOCK),
    (TextureFormat::BC6H_UF16, vk::Format::BC6H_UFLOAT_BLOCK),
    (TextureFormat::BC6H_SF16, vk::Format::BC6H_SFLOAT_BLOCK),
    (TextureFormat::BC7_UNORM, vk::Format::BC7_UNORM_BLOCK),
    (TextureFormat::BC7_UNORM_SRGB, vk::Format::BC7_SRGB_BLOCK),
];

/// `UNKNOWN` when the runtime has no equivalent format.
pub fn texture_format_from_vk(format: vk::Format) -> TextureFormat {
    FORMATS
        .iter()
        .find(|(_, vk_format)| *vk_format == format)
        .map_or(TextureFormat::UNKNOWN, |(ovr_format, _)| *ovr_format)
}

pub fn vk_format(format: TextureFormat) -> vk::Format {
    match format {
        // no alpha in memory, same bytes as the alpha variant
        TextureFormat::B8G8R8X8_UNORM => vk::Format::B8G8R8A8_UNORM,
        TextureFormat::B8G8R8X8_UNORM_SRGB => vk::Format::B8G8R8A8_SRGB,
        _ => FORMATS
            .iter()
            .find(|(ovr_format, _)| *ovr_format == format)
            .map_or(vk::Format::UNDEFINED, |(_, vk_format)| *vk_format),
    }
}

pub fn bind_flags_from_vk(usage: vk::ImageUsageFlags) -> TextureBindFlags {
    let mut flags = TextureBindFlags::empty();
    if usage.contains(vk::ImageUsageFlags::COLOR_ATTACHMENT) {
        flags |= TextureBindFlags::DX_RENDER_TARGET;
    }
    if usage.contains(vk::ImageUsageFlags::STORAGE) {
        flags |= TextureBindFlags::DX_UNORDERED_ACCESS;
    }
    if usage.contains(vk::ImageUsageFlags::DEPTH_STENCIL_ATTACHMENT) {
        flags |= TextureBindFlags::DX_DEPTH_STENCIL;
    }
    flags
}

pub fn misc_flags_from_vk(info: &vk::ImageCreateInfo) -> TextureMiscFlags {
    let mut flags = TextureMiscFlags::empty();
    if info.flags.contains(vk::ImageCreateFlags::MUTABLE_FORMAT) {
        flags |= TextureMiscFlags::DX_TYPELESS;
    }
    if info.flags.contains(vk::ImageCreateFlags::PROTECTED) {
        flags |= TextureMiscFlags::PROTECTED_CONTENT;
    }
    let blit = vk::ImageUsageFlags::TRANSFER_SRC | vk::ImageUsageFlags::TRANSFER_DST;
    if info.mip_levels > 1 && info.usage.contains(blit) {
        flags |= TextureMiscFlags::ALLOW_GENERATE_MIPS;
    }
    flags
}

/// Describes a swap chain whose images match `info`.
pub fn swap_chain_desc_from_vk(info: &vk::ImageCreateInfo) -> Result<TextureSwapChainDesc> {
    if info.image_type != vk::ImageType::TYPE_2D || info.extent.depth != 1 {
        bail!(
            "swap chain images must be flat 2D, got {:?} with depth {}",
            info.image_type,
            info.extent.depth
        );
    }
    let format = texture_format_from_vk(info.format);
    if format == TextureFormat::UNKNOWN {
        bail!("{:?} has no runtime texture format", info.format);
    }
    let ty = if info.flags.contains(vk::ImageCreateFlags::CUBE_COMPATIBLE) {
        TextureType::TEXTURE_CUBE
    } else {
        TextureType::TEXTURE_2D
    };

    Ok(TextureSwapChainDesc {
        ty,
        format,
        array_size: info.array_layers as i32,
        width: info.extent.width as i32,
        height: info.extent.height as i32,
        mip_levels: info.mip_levels as i32,
        sample_count: info.samples.as_raw() as i32,
        static_image: OvrBool::FALSE,
        misc_flags: misc_flags_from_vk(info),
        bind_flags: bind_flags_from_vk(info.usage),
    })
}

pub fn mirror_desc(
    format: vk::Format,
    extent: vk::Extent2D,
    mirror_options: MirrorOptions,
) -> Result<MirrorTextureDesc> {
    let ovr_format = texture_format_from_vk(format);
    if ovr_format == TextureFormat::UNKNOWN {
        bail!("{:?} cannot back a mirror texture", format);
    }
    Ok(MirrorTextureDesc {
        format: ovr_format,
        width: extent.width as i32,
        height: extent.height as i32,
        misc_flags: TextureMiscFlags::empty(),
        mirror_options,
    })
}

/// Every image backing `chain`, in index order.
pub fn enumerate_images(
    api: &dyn Ovr,
    session: &SessionHandle,
    chain: &TextureSwapChain,
) -> Result<Vec<vk::Image>, OvrError> {
    let length = api.texture_swap_chain_length(session, chain)?;
    (0..length)
        .map(|index| api.texture_swap_chain_buffer_vk(session, chain, index))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn color_target() -> vk::ImageCreateInfo {
        vk::ImageCreateInfo {
            image_type: vk::ImageType::TYPE_2D,
            format: vk::Format::R8G8B8A8_SRGB,
            extent: vk::Extent3D {
                width: 1344,
                height: 1600,
                depth: 1,
            },
            mip_levels: 1,
            array_layers: 1,
            samples: vk::SampleCountFlags::TYPE_4,
            usage: vk::ImageUsageFlags::COLOR_ATTACHMENT | vk::ImageUsageFlags::SAMPLED,
            ..Default::default()
        }
    }

    #[test]
    fn formats_map_both_ways() {
        for (ovr_format, format) in FORMATS {
            assert_eq!(texture_format_from_vk(*format), *ovr_format);
            assert_eq!(vk_format(*ovr_format), *format);
        }
        assert_eq!(
            vk_format(TextureFormat::B8G8R8X8_UNORM_SRGB),
            vk::Format::B8G8R8A8_SRGB
        );
        assert_eq!(
            texture_format_from_vk(vk::Format::R32_SFLOAT),
            TextureFormat::UNKNOWN
        );
        assert_eq!(vk_format(TextureFormat::UNKNOWN), vk::Format::UNDEFINED);
    }

    #[test]
    fn color_target_desc() {
        let desc = swap_chain_desc_from_vk(&color_target()).unwrap();
        assert_eq!(desc.ty, TextureType::TEXTURE_2D);
        assert_eq!(desc.format, TextureFormat::R8G8B8A8_UNORM_SRGB);
        assert_eq!((desc.width, desc.height), (1344, 1600));
        assert_eq!(desc.sample_count, 4);
        assert_eq!(desc.bind_flags, TextureBindFlags::DX_RENDER_TARGET);
        assert!(desc.misc_flags.is_empty());
        assert!(!bool::from(desc.static_image));
    }

    #[test]
    fn usage_and_create_flags_translate() {
        let info = vk::ImageCreateInfo {
            format: vk::Format::D32_SFLOAT,
            mip_levels: 4,
            usage: vk::ImageUsageFlags::DEPTH_STENCIL_ATTACHMENT
                | vk::ImageUsageFlags::STORAGE
                | vk::ImageUsageFlags::TRANSFER_SRC
                | vk::ImageUsageFlags::TRANSFER_DST,
            flags: vk::ImageCreateFlags::MUTABLE_FORMAT | vk::ImageCreateFlags::CUBE_COMPATIBLE,
            ..color_target()
        };
        let desc = swap_chain_desc_from_vk(&info).unwrap();
        assert_eq!(desc.ty, TextureType::TEXTURE_CUBE);
        assert_eq!(
            desc.bind_flags,
            TextureBindFlags::DX_DEPTH_STENCIL | TextureBindFlags::DX_UNORDERED_ACCESS
        );
        assert_eq!(
            desc.misc_flags,
            TextureMiscFlags::DX_TYPELESS | TextureMiscFlags::ALLOW_GENERATE_MIPS
        );
    }

    #[test]
    fn volume_and_unknown_formats_are_rejected() {
        let volume = vk::ImageCreateInfo {
            image_type: vk::ImageType::TYPE_3D,
            ..color_target()
        };
        assert!(swap_chain_desc_from_vk(&volume).is_err());

        let odd = vk::ImageCreateInfo {
            format: vk::Format::R32G32_UINT,
            ..color_target()
        };
        assert!(swap_chain_desc_from_vk(&odd).is_err());
    }

    #[test]
    fn mirror_desc_keeps_options() {
        let desc = mirror_desc(
            vk::Format::B8G8R8A8_SRGB,
            vk::Extent2D {
                width: 960,
                height: 540,
            },
            MirrorOptions::LEFT_EYE_ONLY,
        )
        .unwrap();
        assert_eq!(desc.format, TextureFormat::B8G8R8A8_UNORM_SRGB);
        assert_eq!((desc.width, desc.height), (960, 540));
        assert_eq!(desc.mirror_options, MirrorOptions::LEFT_EYE_ONLY);
    }
}
