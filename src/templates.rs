//! Packaging file templates: RPM spec and desktop entry

use chrono::NaiveDate;

use crate::platform::NativePackage;

pub const TEMPLATE_SPEC: &str = r#"Name:       {{APP_NAME}}
Summary:    {{LAUNCHER_NAME}}
Version:    {{VERSION}}
Release:    {{RELEASE}}
Group:      Game
License:    LICENSE
BuildArch:  {{ARCH}}
URL:        http://example.org/
Requires:   SDL2 >= 2.0.9
Requires:   freetype
Requires:   libpng
Requires:   openssl
Requires:   zlib
Requires:   glib2
Requires:   libaudioresource
#Requires:   libkeepalive-glib
%description
{{DESCRIPTION}}
%prep
echo "Nothing to do here. Skip this step"
%build
echo "Nothing to do here. Skip this step"
%install
rm -rf %{buildroot}
mkdir -p %{buildroot}
cp -r %{_topdir}/BUILD/usr %{buildroot}/
%files
%defattr(644,root,root,-)
%attr(755,root,root) %{_bindir}/%{name}
{{ICON_FILES}}
%attr(644,root,root) %{_datadir}/%{name}/%{name}.pck
%attr(644,root,root) %{_datadir}/applications/%{name}.desktop
%changelog
* {{DATE}} Godot Game Engine
- application %{name} packed to RPM
"#;

pub const TEMPLATE_DESKTOP: &str = r#"[Desktop Entry]
Type=Application
X-Nemo-Application-Type=Game
{{ICON_ENTRY}}
Exec=/usr/bin/{{APP_NAME}} --main-pack /usr/share/{{APP_NAME}}/{{APP_NAME}}.pck
Name={{LAUNCHER_NAME}}
Name[en]={{LAUNCHER_NAME}}
"#;

/// Replace `{{PLACEHOLDER}}` patterns in a template string.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        let placeholder = format!("{{{{{}}}}}", key);
        result = result.replace(&placeholder, value);
    }
    result
}

/// Date in RPM changelog format, e.g. "Thu Dec 19 2019"
pub fn changelog_date(date: NaiveDate) -> String {
    date.format("%a %b %d %Y").to_string()
}

pub fn render_spec(pack: &NativePackage, has_icon: bool, date: NaiveDate) -> String {
    let icon_files = if has_icon {
        "%attr(644,root,root) %{_datadir}/%{name}/%{name}.png"
    } else {
        ""
    };
    let date = changelog_date(date);
    render(TEMPLATE_SPEC, &[
        ("APP_NAME", pack.name.as_str()),
        ("LAUNCHER_NAME", pack.launcher_name.as_str()),
        ("VERSION", pack.version.as_str()),
        ("RELEASE", pack.release.as_str()),
        ("ARCH", pack.target.arch.as_str()),
        ("DESCRIPTION", pack.description.as_str()),
        ("ICON_FILES", icon_files),
        ("DATE", date.as_str()),
    ])
}

pub fn render_desktop(pack: &NativePackage, has_icon: bool) -> String {
    let icon_entry = if has_icon {
        format!("Icon=/usr/share/{0}/{0}.png", pack.name)
    } else {
        String::new()
    };
    render(TEMPLATE_DESKTOP, &[
        ("APP_NAME", pack.name.as_str()),
        ("LAUNCHER_NAME", pack.launcher_name.as_str()),
        ("ICON_ENTRY", icon_entry.as_str()),
    ])
}
