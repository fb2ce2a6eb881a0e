//! NSI script template.

/// Handlebars template for the installer script.
///
/// Paths are relative to the script directory, which `makensis` uses as its
/// working directory.
pub const NSI_TEMPLATE: &str = r#"; {{app_name}} Windows installer script

Unicode true

!define APP_NAME "{{app_name}}"
!define APP_VERSION "{{version}}"
!define APP_PUBLISHER "{{publisher}}"
!define APP_URL "{{homepage}}"
!define APP_EXECUTABLE "{{gui_executable}}"
!define UNINSTALL_KEY "Software\Microsoft\Windows\CurrentVersion\Uninstall\${APP_NAME}"

!include "MUI2.nsh"

Name "${APP_NAME}"
OutFile "{{app_name}}-${APP_VERSION}-installer.exe"
InstallDir "$PROGRAMFILES64\${APP_NAME}"
InstallDirRegKey HKLM "Software\${APP_NAME}" "InstallPath"
RequestExecutionLevel admin
SetCompressor /SOLID lzma

VIProductVersion "{{version_nsis}}"
VIAddVersionKey "ProductName" "${APP_NAME}"
VIAddVersionKey "ProductVersion" "${APP_VERSION}"
VIAddVersionKey "CompanyName" "${APP_PUBLISHER}"
VIAddVersionKey "FileVersion" "{{version_nsis}}"
VIAddVersionKey "FileDescription" "{{description}}"
VIAddVersionKey "LegalCopyright" "${APP_PUBLISHER}"

!define MUI_ABORTWARNING
{{#if installer_icon}}
!define MUI_ICON "{{installer_icon}}"
!define MUI_UNICON "{{installer_icon}}"
{{/if}}

!insertmacro MUI_PAGE_WELCOME
{{#if license_file}}
!insertmacro MUI_PAGE_LICENSE "{{license_file}}"
{{/if}}
!insertmacro MUI_PAGE_COMPONENTS
!insertmacro MUI_PAGE_DIRECTORY
!insertmacro MUI_PAGE_INSTFILES
!insertmacro MUI_PAGE_FINISH

!insertmacro MUI_UNPAGE_WELCOME
!insertmacro MUI_UNPAGE_CONFIRM
!insertmacro MUI_UNPAGE_INSTFILES

!insertmacro MUI_LANGUAGE "English"
!insertmacro MUI_LANGUAGE "SimpChinese"

Section "Core Files" SecCore
    SectionIn RO

    SetOutPath "$INSTDIR"

    File "{{app_dir}}\*.exe"
    File /nonfatal "{{app_dir}}\*.dll"
{{#each qt_dirs}}
    File /nonfatal /r "{{source}}"
{{/each}}

    WriteUninstaller "$INSTDIR\uninstall.exe"
    WriteRegStr HKLM "Software\${APP_NAME}" "InstallPath" "$INSTDIR"

    WriteRegStr HKLM "${UNINSTALL_KEY}" "DisplayName" "${APP_NAME}"
    WriteRegStr HKLM "${UNINSTALL_KEY}" "DisplayVersion" "${APP_VERSION}"
    WriteRegStr HKLM "${UNINSTALL_KEY}" "Publisher" "${APP_PUBLISHER}"
    WriteRegStr HKLM "${UNINSTALL_KEY}" "URLInfoAbout" "${APP_URL}"
    WriteRegStr HKLM "${UNINSTALL_KEY}" "DisplayIcon" "$INSTDIR\${APP_EXECUTABLE}"
    WriteRegStr HKLM "${UNINSTALL_KEY}" "UninstallString" '"$INSTDIR\uninstall.exe"'
    WriteRegDWORD HKLM "${UNINSTALL_KEY}" "NoModify" 1
    WriteRegDWORD HKLM "${UNINSTALL_KEY}" "NoRepair" 1

    CreateDirectory "$SMPROGRAMS\${APP_NAME}"
    CreateShortCut "$SMPROGRAMS\${APP_NAME}\${APP_NAME}.lnk" "$INSTDIR\${APP_EXECUTABLE}"
    CreateShortCut "$SMPROGRAMS\${APP_NAME}\Uninstall ${APP_NAME}.lnk" "$INSTDIR\uninstall.exe"
    CreateShortCut "$DESKTOP\${APP_NAME}.lnk" "$INSTDIR\${APP_EXECUTABLE}"
{{#each associations}}

    WriteRegStr HKCR ".{{extension}}" "" "{{prog_id}}"
    WriteRegStr HKCR "{{prog_id}}" "" "{{description}}"
    WriteRegStr HKCR "{{prog_id}}\DefaultIcon" "" "$INSTDIR\${APP_EXECUTABLE},0"
    WriteRegStr HKCR "{{prog_id}}\shell\open\command" "" '"$INSTDIR\${APP_EXECUTABLE}" "%1"'
{{/each}}
SectionEnd

Section "Uninstall"
    Delete "$INSTDIR\*.exe"
    Delete "$INSTDIR\*.dll"
{{#each qt_dirs}}
    RMDir /r "{{installed}}"
{{/each}}
    Delete "$INSTDIR\uninstall.exe"
    RMDir "$INSTDIR"

    Delete "$SMPROGRAMS\${APP_NAME}\${APP_NAME}.lnk"
    Delete "$SMPROGRAMS\${APP_NAME}\Uninstall ${APP_NAME}.lnk"
    RMDir "$SMPROGRAMS\${APP_NAME}"
    Delete "$DESKTOP\${APP_NAME}.lnk"

    DeleteRegKey HKLM "Software\${APP_NAME}"
    DeleteRegKey HKLM "${UNINSTALL_KEY}"
{{#each associations}}
    DeleteRegKey HKCR ".{{extension}}"
    DeleteRegKey HKCR "{{prog_id}}"
{{/each}}
SectionEnd
"#;
