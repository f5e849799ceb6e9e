// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    xiaohongshu = { Platform::Xiaohongshu, LoginMode::Qr },
    weixin = { Platform::WeixinChannels, LoginMode::Qr },
    douyin = { Platform::Douyin, LoginMode::Qr },
    kuaishou = { Platform::Kuaishou, LoginMode::Qr },
    baijiahao = { Platform::Baijiahao, LoginMode::Manual },
    tiktok = { Platform::Tiktok, LoginMode::Manual },
    bilibili = { Platform::Bilibili, LoginMode::UploadOnly },
)]
fn login_modes(platform: Platform, expected: LoginMode) {
    assert_eq!(platform.login_mode(), expected);
}

#[test]
fn only_qr_platforms_support_silent_renewal() {
    for platform in Platform::ALL {
        assert_eq!(
            platform.supports_silent_renewal(),
            platform.login_mode() == LoginMode::Qr,
            "{platform}"
        );
    }
}

#[test]
fn round_trips_through_str() {
    for platform in Platform::ALL {
        let parsed: Platform = platform.as_str().parse().unwrap();
        assert_eq!(parsed, platform);
    }
}

#[test]
fn unknown_name_is_rejected() {
    let err = "myspace".parse::<Platform>().unwrap_err();
    assert_eq!(err, UnknownPlatform("myspace".to_string()));
}

#[test]
fn serializes_as_snake_case() {
    let json = serde_json::to_string(&Platform::WeixinChannels).unwrap();
    assert_eq!(json, "\"weixin_channels\"");
}
