//! Win32 `SendInput` backend.

use super::{InputDriver, InputError};
use windows::Win32::UI::Input::KeyboardAndMouse::{
    SendInput, INPUT, INPUT_0, INPUT_KEYBOARD, INPUT_MOUSE, KEYBDINPUT, KEYBD_EVENT_FLAGS,
    KEYEVENTF_KEYUP, MOUSEEVENTF_LEFTDOWN, MOUSEEVENTF_LEFTUP, MOUSEEVENTF_MIDDLEDOWN,
    MOUSEEVENTF_MIDDLEUP, MOUSEEVENTF_RIGHTDOWN, MOUSEEVENTF_RIGHTUP, MOUSEINPUT,
    MOUSE_EVENT_FLAGS, VIRTUAL_KEY,
};

/// Injects real key and mouse events into the foreground session.
#[derive(Debug, Default)]
pub struct SendInputDriver;

impl SendInputDriver {
    pub fn new() -> Self {
        Self
    }
}

impl InputDriver for SendInputDriver {
    fn key_down(&mut self, key: &str) -> Result<(), InputError> {
        send_vk(parse_vk(key)?, KEYBD_EVENT_FLAGS(0))
    }

    fn key_up(&mut self, key: &str) -> Result<(), InputError> {
        send_vk(parse_vk(key)?, KEYEVENTF_KEYUP)
    }

    fn mouse_down(&mut self, button: &str) -> Result<(), InputError> {
        send_mouse(button_flags(button, true)?)
    }

    fn mouse_up(&mut self, button: &str) -> Result<(), InputError> {
        send_mouse(button_flags(button, false)?)
    }
}

fn send_vk(vk: VIRTUAL_KEY, flags: KEYBD_EVENT_FLAGS) -> Result<(), InputError> {
    let input = INPUT {
        r#type: INPUT_KEYBOARD,
        Anonymous: INPUT_0 {
            ki: KEYBDINPUT {
                wVk: vk,
                wScan: 0,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    };
    let sent = unsafe { SendInput(&[input], std::mem::size_of::<INPUT>() as i32) };
    if sent == 0 {
        return Err(InputError::Injection("SendInput returned 0".into()));
    }
    Ok(())
}

fn send_mouse(flags: MOUSE_EVENT_FLAGS) -> Result<(), InputError> {
    let input = INPUT {
        r#type: INPUT_MOUSE,
        Anonymous: INPUT_0 {
            mi: MOUSEINPUT {
                dx: 0,
                dy: 0,
                mouseData: 0,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    };
    let sent = unsafe { SendInput(&[input], std::mem::size_of::<INPUT>() as i32) };
    if sent == 0 {
        return Err(InputError::Injection("SendInput returned 0".into()));
    }
    Ok(())
}

fn button_flags(button: &str, down: bool) -> Result<MOUSE_EVENT_FLAGS, InputError> {
    Ok(match (button, down) {
        ("left", true) => MOUSEEVENTF_LEFTDOWN,
        ("left", false) => MOUSEEVENTF_LEFTUP,
        ("right", true) => MOUSEEVENTF_RIGHTDOWN,
        ("right", false) => MOUSEEVENTF_RIGHTUP,
        ("middle", true) => MOUSEEVENTF_MIDDLEDOWN,
        ("middle", false) => MOUSEEVENTF_MIDDLEUP,
        _ => return Err(InputError::UnknownButton(button.to_string())),
    })
}

fn parse_vk(token: &str) -> Result<VIRTUAL_KEY, InputError> {
    // Names here track the validated action vocabulary in `crate::actions`.
    let vk = match token {
        "enter" => 0x0D,  // VK_RETURN
        "tab" => 0x09,    // VK_TAB
        "esc" => 0x1B,    // VK_ESCAPE
        "space" => 0x20,  // VK_SPACE
        "backspace" => 0x08, // VK_BACK
        "delete" => 0x2E, // VK_DELETE
        "home" => 0x24,   // VK_HOME
        "end" => 0x23,    // VK_END
        "pageup" => 0x21, // VK_PRIOR
        "pagedown" => 0x22, // VK_NEXT
        "up" => 0x26,     // VK_UP
        "down" => 0x28,   // VK_DOWN
        "left" => 0x25,   // VK_LEFT
        "right" => 0x27,  // VK_RIGHT
        _ => {
            let mut chars = token.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) if ch.is_ascii_lowercase() => ch.to_ascii_uppercase() as u16,
                (Some(ch), None) if ch.is_ascii_digit() => ch as u16,
                _ => return Err(InputError::UnknownKey(token.to_string())),
            }
        }
    };
    Ok(VIRTUAL_KEY(vk))
}
